#[macro_use]
extern crate criterion;

use criterion::Criterion;
use deadspells::castability::{CastPolicy, LandDrops};
use deadspells::deck::Deck;
use deadspells::simulation::{aggregate, SimulationConfig};
use std::collections::BTreeMap;

fn counts(entries: &[(&str, usize)]) -> BTreeMap<String, usize> {
    entries.iter().map(|(e, n)| (e.to_string(), *n)).collect()
}

fn criterion_function(c: &mut Criterion) {
    // A Grixis limited deck with a couple of mana rocks
    let spells = counts(&[
        ("1U", 3),
        ("2UB", 3),
        ("1R", 3),
        ("3BR", 2),
        ("B", 3),
        ("4*2U", 2),
        ("2*>*", 2),
        ("UR", 2),
        ("5", 3),
    ]);
    let mana = counts(&[(">U", 5), (">B", 4), (">R", 4), (">UBT", 2), (">BRT", 2)]);
    let deck = Deck::from_counts(&spells, &mana, 40).expect("Bad deck");
    for (name, policy) in &[
        ("independent_colors", CastPolicy::IndependentColors),
        ("matching", CastPolicy::Matching),
    ] {
        let config = SimulationConfig {
            deck: &deck,
            hand_size: 7,
            draws: 10,
            run_count: 1000,
            seed: 42,
            on_the_play: true,
            cast_policy: *policy,
            land_drops: LandDrops::Unlimited,
        };
        c.bench_function(&format!("grixis aggregate 1000 {}", name), |b| {
            b.iter(|| aggregate(&config).expect("simulation ok"))
        });
    }
}

criterion_group!(benches, criterion_function);
criterion_main!(benches);
