use futures::future::{BoxFuture, FutureExt};

use super::SortEngine;

impl SortEngine<'_> {
    /// Top-down merge sort over the inclusive range `[left, right]`.
    pub(super) fn merge_sort(&mut self, left: usize, right: usize) -> BoxFuture<'_, ()> {
        async move {
            if left >= right {
                return;
            }
            let middle = left + (right - left) / 2;
            self.merge_sort(left, middle).await;
            self.merge_sort(middle + 1, right).await;
            self.merge(left, middle, right).await;
        }
        .boxed()
    }

    /// Merges the sorted runs `[left, middle]` and `[middle + 1, right]`.
    /// Every placement is published, so intermediate snapshots may show a
    /// value twice until the merge completes.
    async fn merge(&mut self, left: usize, middle: usize, right: usize) {
        let left_run = self.work[left..=middle].to_vec();
        let right_run = self.work[middle + 1..=right].to_vec();

        let (mut i, mut j, mut k) = (0, 0, left);

        while i < left_run.len() && j < right_run.len() {
            if self.less_or_equal(left_run[i], right_run[j]) {
                self.work[k] = left_run[i];
                i += 1;
            } else {
                self.work[k] = right_run[j];
                j += 1;
            }
            self.step().await;
            k += 1;
        }

        while i < left_run.len() {
            self.work[k] = left_run[i];
            self.step().await;
            i += 1;
            k += 1;
        }

        while j < right_run.len() {
            self.work[k] = right_run[j];
            self.step().await;
            j += 1;
            k += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{engine::tests::sort_recorded, Algorithm};

    #[tokio::test]
    async fn publishes_every_placement() {
        let (report, snapshots) = sort_recorded(Algorithm::MergeSort, &[4.0, 2.0, 7.0, 1.0])
            .await
            .unwrap();

        // merge(0, 0, 1) and merge(2, 2, 3) place two elements each,
        // merge(0, 1, 3) places four.
        assert_eq!(
            snapshots,
            vec![
                vec![2.0, 2.0, 7.0, 1.0],
                vec![2.0, 4.0, 7.0, 1.0],
                vec![2.0, 4.0, 1.0, 1.0],
                vec![2.0, 4.0, 1.0, 7.0],
                vec![1.0, 4.0, 1.0, 7.0],
                vec![1.0, 2.0, 1.0, 7.0],
                vec![1.0, 2.0, 4.0, 7.0],
                vec![1.0, 2.0, 4.0, 7.0],
            ]
        );
        assert_eq!(report.steps, 2 + 2 + 4);
        assert_eq!(report.sorted, vec![1.0, 2.0, 4.0, 7.0]);
    }

    #[tokio::test]
    async fn equal_keys_take_the_left_run_first() {
        let (report, snapshots) = sort_recorded(Algorithm::MergeSort, &[2.0, 2.0, 1.0])
            .await
            .unwrap();

        // merge(0, 0, 1): 2 <= 2 takes left, then drains right.
        assert_eq!(snapshots[0], vec![2.0, 2.0, 1.0]);
        assert_eq!(report.sorted, vec![1.0, 2.0, 2.0]);
        assert_eq!(report.steps, 2 + 3);
    }
}
