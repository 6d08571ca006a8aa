use avl_map::{AvlTreeMap, LevelOrderEntry, Side};
use rand::{rngs::StdRng, Rng, SeedableRng};

const STEPS: usize = 100;
const KEY_RANGE: u32 = 100;

fn print_levels(map: &AvlTreeMap<u32, String>) {
    let mut depth = None;
    for LevelOrderEntry {
        key,
        value,
        height,
        depth: entry_depth,
        side,
    } in map.level_order()
    {
        if depth != Some(entry_depth) {
            if depth.is_some() {
                println!();
            }
            print!("{entry_depth:>2}:");
            depth = Some(entry_depth);
        }
        let marker = match side {
            None => "*",
            Some(Side::Left) => "/",
            Some(Side::Right) => "\\",
        };
        print!(" {marker}{key}={value}(h{height})");
    }
    println!();
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut map = AvlTreeMap::new();

    for _ in 0..STEPS {
        let key = rng.gen_range(0..KEY_RANGE);
        let value = format!("str{}", rng.gen_range(0..KEY_RANGE));
        map.insert(key, value);
    }
    println!("After inserts: {} entries, height {:?}", map.len(), map.height());
    print_levels(&map);

    for _ in 0..STEPS {
        map.remove(&rng.gen_range(0..KEY_RANGE));
    }
    println!("After removals: {} entries, height {:?}", map.len(), map.height());
    print_levels(&map);

    map.clear();
    println!("After clear: {} entries", map.len());
}
