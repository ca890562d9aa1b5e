use datastore_core::{DatastoreError, Labels, TaskLabels};

/// Represents a dataset that can be iterated over and accessed by index.
///
/// A dataset is a collection of items, where each item is usually a
/// `(features, label)` pair. The same contract serves any training loop:
/// indexed access, a length, restartable iteration and an optional hook
/// called between epochs.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    ///
    /// This type must be `Send` and `'static` so items can be handed to
    /// whatever consumes the batches.
    type Item: Send + 'static;

    /// Returns the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::IndexOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError>;

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a lazy iterator over `get(0), get(1), ..., get(len - 1)`.
    ///
    /// Each call starts again from index 0, so a dataset can be iterated
    /// any number of times.
    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter::new(self)
    }

    /// Called once at the end of every epoch by the driving training loop.
    ///
    /// Does nothing by default; datasets that reshuffle or refresh state
    /// between epochs override it.
    fn on_epoch_end(&mut self) {}
}

/// Optional capability: bulk access to the full feature and label arrays.
///
/// Algorithms that need every label at once (stratification) require it
/// through a trait bound.
pub trait InMemoryDataset: Dataset {
    /// The bulk feature array type.
    type Features;

    /// Returns the full feature array and the aligned labels.
    fn load_data(&self) -> (&Self::Features, &Labels);
}

/// Optional capability: a per-instance registry of task labels.
pub trait MultiTaskDataset: Dataset {
    fn task_labels(&self) -> &TaskLabels;

    /// Names of the registered tasks, in insertion order.
    fn get_labels(&self) -> Vec<&str> {
        self.task_labels().names().collect()
    }
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Item = D::Item;

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        (**self).get(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Iterator over the items of a dataset, see [`Dataset::iter`].
#[derive(Debug)]
pub struct DatasetIter<'a, D: Dataset> {
    dataset: &'a D,
    current: usize,
}

impl<'a, D: Dataset> DatasetIter<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self {
            dataset,
            current: 0,
        }
    }
}

impl<'a, D: Dataset> Iterator for DatasetIter<'a, D> {
    type Item = Result<D::Item, DatastoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.current);
        self.current += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl<'a, D: Dataset> ExactSizeIterator for DatasetIter<'a, D> {}
