mod invariants;
mod sharing;
mod util;
