use futures::future::{BoxFuture, FutureExt};

use super::SortEngine;

impl SortEngine<'_> {
    /// Recursive quick sort over the inclusive range `[low, high]`.
    pub(super) fn quick_sort(&mut self, low: usize, high: usize) -> BoxFuture<'_, ()> {
        async move {
            if low >= high {
                return;
            }
            let pivot_index = self.partition(low, high).await;
            if pivot_index > low {
                self.quick_sort(low, pivot_index - 1).await;
            }
            self.quick_sort(pivot_index + 1, high).await;
        }
        .boxed()
    }

    /// Lomuto partition around the last element of the range.
    ///
    /// Swaps made during the scan are published and paced. The closing swap
    /// that moves the pivot into place is not.
    async fn partition(&mut self, low: usize, high: usize) -> usize {
        let pivot = self.work[high];
        // First slot not yet known to hold a value below the pivot.
        let mut boundary = low;

        for j in low..high {
            if self.less(self.work[j], pivot) {
                if boundary != j {
                    self.work.swap(boundary, j);
                    self.step().await;
                }
                boundary += 1;
            }
        }
        self.work.swap(boundary, high);

        boundary
    }
}
