/// A user-supplied function applied to a sample or a label when it is
/// accessed (never at load time).
pub type Transform<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Applies `transform` to `value` when one is set.
pub(crate) fn apply<T>(transform: &Option<Transform<T>>, value: T) -> T {
    match transform {
        Some(transform) => transform(value),
        None => value,
    }
}
