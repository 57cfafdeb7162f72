//! Concurrent compare-and-swap tests for the repository implementations
//!
//! Verifies that exactly one of several racing writers wins a CAS on the
//! same path, for both the in-memory and the file-backed store.

use meta_store::{FileRepository, MemoryRepository, PersistRepository};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

fn race_create_if_absent(repo: Arc<dyn PersistRepository>, threads: usize) -> Vec<usize> {
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|thread_id| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let won = repo
                    .compare_and_swap("/unit/versions/1", None, &format!("writer-{}", thread_id))
                    .unwrap();
                (thread_id, won)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread should not panic"))
        .filter(|(_, won)| *won)
        .map(|(thread_id, _)| thread_id)
        .collect()
}

#[test]
fn test_memory_cas_has_single_winner() {
    let repo: Arc<dyn PersistRepository> = Arc::new(MemoryRepository::new());
    let winners = race_create_if_absent(Arc::clone(&repo), 8);

    assert_eq!(winners.len(), 1, "exactly one writer should win");
    assert_eq!(
        repo.get("/unit/versions/1").unwrap(),
        Some(format!("writer-{}", winners[0]))
    );
}

#[test]
fn test_file_cas_has_single_winner() {
    let dir = tempdir().unwrap();
    let repo: Arc<dyn PersistRepository> = Arc::new(FileRepository::open(dir.path()).unwrap());
    let winners = race_create_if_absent(Arc::clone(&repo), 6);

    assert_eq!(winners.len(), 1, "exactly one writer should win");
    assert_eq!(
        repo.get("/unit/versions/1").unwrap(),
        Some(format!("writer-{}", winners[0]))
    );
}

#[test]
fn test_file_concurrent_writes_to_different_nodes_all_succeed() {
    let dir = tempdir().unwrap();
    let repo = Arc::new(FileRepository::open(dir.path()).unwrap());
    let barrier = Arc::new(Barrier::new(5));

    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                repo.persist(&format!("/metadata/db_{}", thread_id), "")
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic").unwrap();
    }
    assert_eq!(repo.get_children_keys("/metadata").unwrap().len(), 5);
}
