//! Runs as its own test binary so no other test maps memory concurrently.

#![cfg(target_os = "linux")]

use parmul::shm::SharedRegion;
use parmul::{multiply_parallel_processes, Matrix};

fn maps() -> Vec<(usize, usize, String)> {
    std::fs::read_to_string("/proc/self/maps")
        .unwrap()
        .lines()
        .map(|line| {
            let mut fields = line.split_whitespace();
            let range = fields.next().unwrap();
            let perms = fields.next().unwrap().to_string();
            let (lo, hi) = range.split_once('-').unwrap();
            (
                usize::from_str_radix(lo, 16).unwrap(),
                usize::from_str_radix(hi, 16).unwrap(),
                perms,
            )
        })
        .collect()
}

fn shared_mapping_count() -> usize {
    maps().iter().filter(|(_, _, perms)| perms.ends_with('s')).count()
}

fn is_mapped(addr: usize) -> bool {
    maps().iter().any(|(lo, hi, _)| (*lo..*hi).contains(&addr))
}

#[test]
fn no_shared_mapping_outlives_a_call() {
    let region = SharedRegion::new(4096).unwrap();
    let addr = region.addr();
    assert!(is_mapped(addr));
    region.release().unwrap();
    assert!(!is_mapped(addr));

    let dropped = {
        let region = SharedRegion::new(4096).unwrap();
        region.addr()
    };
    assert!(!is_mapped(dropped));

    let before = shared_mapping_count();
    let a = Matrix::sequential(48).unwrap();
    let b = Matrix::sequential(48).unwrap();
    for workers in [1, 2, 4] {
        multiply_parallel_processes(&a, &b, workers).unwrap();
        assert_eq!(shared_mapping_count(), before, "workers={workers}");
    }
}
