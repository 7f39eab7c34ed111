use super::SortEngine;

impl SortEngine<'_> {
    /// Full-width bubble sort: every pass scans all indices, the upper bound
    /// never shrinks.
    pub(super) async fn bubble_sort(&mut self) {
        let len = self.work.len();
        for _ in 0..len {
            for j in 0..len {
                // The last index has no right-hand neighbour and is never
                // out of order.
                let Some(&next) = self.work.get(j + 1) else {
                    continue;
                };
                if self.less(next, self.work[j]) {
                    self.work.swap(j, j + 1);
                    self.step().await;
                }
            }
        }
    }
}
