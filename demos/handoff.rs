//! Handoff example
//!
//! A loader thread builds a table of assets, then workers read it
//! concurrently. The first worker read freezes the table; afterwards no
//! thread can mutate it and nobody synchronizes to read it.

use freezelist::{FreezeListError, FreezingList};
use std::sync::{mpsc, Arc};
use std::thread;

#[derive(Debug, Clone)]
struct Asset {
    name: String,
    bytes: usize,
}

fn main() {
    freezelist::diagnostics::init_from_env();

    let (sender, receiver) = mpsc::channel::<Arc<FreezingList<Arc<Asset>>>>();

    // Loader thread: owns the table while it is being built.
    let loader = thread::spawn(move || {
        let table = Arc::new(FreezingList::new());
        for i in 0..32 {
            let asset = Asset {
                name: format!("texture_{i:02}"),
                bytes: 1024 * (i + 1),
            };
            table.add(Arc::new(asset)).expect("loader owns the table");
        }
        sender.send(Arc::clone(&table)).expect("main thread is listening");
        table
    });

    let table = receiver.recv().expect("loader sends the table");

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let table = Arc::clone(&table);
            thread::spawn(move || loop {
                match table.iter() {
                    Ok(assets) => {
                        let total: usize = assets.map(|asset| asset.bytes).sum();
                        println!("worker {worker}: {total} bytes");
                        return total;
                    }
                    Err(err) if err.is_retryable() => thread::yield_now(),
                    Err(err) => panic!("worker {worker}: {err}"),
                }
            })
        })
        .collect();

    let totals: Vec<usize> = workers
        .into_iter()
        .map(|worker| worker.join().expect("worker panicked"))
        .collect();
    assert!(totals.windows(2).all(|pair| pair[0] == pair[1]));

    let table = loader.join().expect("loader panicked");
    println!("first asset: {}", table.get_ref(0).map(|a| a.name.as_str()).unwrap_or("none"));
    println!("{}", table.stats());

    match table.add(Arc::new(Asset { name: "late".into(), bytes: 0 })) {
        Err(FreezeListError::WrongOwner { .. }) => println!("main thread cannot mutate the loader's table"),
        other => println!("unexpected: {other:?}"),
    }
}
