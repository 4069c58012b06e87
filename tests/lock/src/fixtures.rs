//! Puzzle inputs pinned by the lock tests.

use sha2::{Digest, Sha256};

/// Domain prefix for hashing fixture output.
pub const DOMAIN_FIXTURE_OUTPUT: &[u8] = b"WAYMARK::FIXTURE_OUTPUT::V1\0";

pub const ELEVATOR_EXAMPLE: &str = "\
The first floor contains a hydrogen-compatible microchip and a lithium-compatible microchip.
The second floor contains a hydrogen generator.
The third floor contains a lithium generator.
The fourth floor contains nothing relevant.
";

/// A full-size layout: five element pairs, answer 33.
pub const ELEVATOR_FIVE_PAIRS: &str = "\
The first floor contains a promethium generator and a promethium-compatible microchip.
The second floor contains a cobalt generator, a curium generator, a ruthenium generator, and a plutonium generator.
The third floor contains a cobalt-compatible microchip, a curium-compatible microchip, a ruthenium-compatible microchip, and a plutonium-compatible microchip.
The fourth floor contains nothing relevant.
";

pub const CUBICLE_EXAMPLE: &str = "10\n";

pub const CUBICLE_INPUT: &str = "1358\n";

pub const STORAGE_EXAMPLE: &str = "\
root@ebhq-gridcenter# df -h
Filesystem            Size  Used  Avail  Use%
/dev/grid/node-x0-y0   10T    8T     2T   80%
/dev/grid/node-x0-y1   11T    6T     5T   54%
/dev/grid/node-x0-y2   32T   28T     4T   87%
/dev/grid/node-x1-y0    9T    7T     2T   77%
/dev/grid/node-x1-y1    8T    0T     8T    0%
/dev/grid/node-x1-y2   11T    7T     4T   63%
/dev/grid/node-x2-y0   10T    6T     4T   60%
/dev/grid/node-x2-y1    9T    8T     1T   88%
/dev/grid/node-x2-y2    9T    6T     3T   66%
";

pub const DUCT_EXAMPLE: &str = "\
###########
#0.1.....2#
#.#######.#
#4.......3#
###########
";

/// `sha256:<hex>` over the domain prefix and `lines` joined by `\n`.
#[must_use]
pub fn output_digest(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_FIXTURE_OUTPUT);
    hasher.update(lines.join("\n").as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
