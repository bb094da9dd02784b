use std::ops::Range;

/// Split `z_extent` planes into contiguous slabs, one per worker
///
/// The requested number of workers is clamped to `1..=z_extent` so that no slab is empty.
/// Every slab holds `z_extent / workers` planes, the final slab also absorbs the remainder.
/// The returned ranges are ordered, disjoint and together cover `0..z_extent`.
pub fn partition_planes(z_extent: usize, workers: usize) -> Vec<Range<usize>> {
    if z_extent == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, z_extent);
    let per_worker = z_extent / workers;
    (0..workers)
        .map(|worker| {
            let start = worker * per_worker;
            let end = if worker + 1 == workers {
                z_extent
            } else {
                start + per_worker
            };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::partition_planes;
    use proptest::prelude::*;

    #[test]
    fn the_last_slab_absorbs_the_remainder() {
        assert_eq!(partition_planes(10, 4), vec![0..2, 2..4, 4..6, 6..10]);
        assert_eq!(partition_planes(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn more_workers_than_planes_is_clamped() {
        assert_eq!(partition_planes(3, 8), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn zero_workers_is_a_single_slab() {
        assert_eq!(partition_planes(5, 0), vec![0..5]);
    }

    proptest! {
        #[test]
        fn slabs_tile_the_axis(z_extent in 1_usize..200, workers in 0_usize..64) {
            let slabs = partition_planes(z_extent, workers);
            prop_assert!(!slabs.is_empty());
            prop_assert_eq!(slabs[0].start, 0);
            prop_assert_eq!(slabs[slabs.len() - 1].end, z_extent);
            for pair in slabs.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert!(slabs.iter().all(|slab| !slab.is_empty()));
        }
    }
}
