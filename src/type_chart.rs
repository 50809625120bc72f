//! Static 18x18 type-effectiveness lookup.
//!
//! The table is built once on first use and is read-only afterwards, so it is
//! safe to share between any number of concurrently running battles.

use schema::CreatureType;
use std::collections::HashMap;
use std::sync::OnceLock;

static TYPE_CHART: OnceLock<HashMap<(CreatureType, CreatureType), f64>> = OnceLock::new();

/// Effectiveness multiplier of an attacking type against one defending type.
/// Returns 0.0, 0.5, 1.0 or 2.0; unlisted pairings default to 1.0.
pub fn effectiveness(attacking: CreatureType, defending: CreatureType) -> f64 {
    chart()
        .get(&(attacking, defending))
        .copied()
        .unwrap_or(1.0)
}

/// Combined effectiveness against a (possibly dual-typed) defender: the
/// product over all defending types, so 4.0 and 0.25 are reachable and any
/// single immunity zeroes the whole thing.
pub fn effectiveness_against(attacking: CreatureType, defending: &[CreatureType]) -> f64 {
    defending
        .iter()
        .map(|&def| effectiveness(attacking, def))
        .product()
}

fn chart() -> &'static HashMap<(CreatureType, CreatureType), f64> {
    TYPE_CHART.get_or_init(build_chart)
}

fn build_chart() -> HashMap<(CreatureType, CreatureType), f64> {
    use CreatureType::*;

    // Only the non-neutral pairings are listed; everything else is 1.0.
    // (attacker, super-effective targets, resisted-by, no-effect-on)
    let rows: &[(
        CreatureType,
        &[CreatureType],
        &[CreatureType],
        &[CreatureType],
    )] = &[
        (Normal, &[], &[Rock, Steel], &[Ghost]),
        (
            Fighting,
            &[Normal, Rock, Steel, Ice, Dark],
            &[Flying, Poison, Bug, Psychic, Fairy],
            &[Ghost],
        ),
        (Flying, &[Fighting, Bug, Grass], &[Rock, Steel, Electric], &[]),
        (
            Poison,
            &[Grass, Fairy],
            &[Poison, Ground, Rock, Ghost],
            &[Steel],
        ),
        (
            Ground,
            &[Poison, Rock, Steel, Fire, Electric],
            &[Bug, Grass],
            &[Flying],
        ),
        (
            Rock,
            &[Flying, Bug, Fire, Ice],
            &[Fighting, Ground, Steel],
            &[],
        ),
        (
            Bug,
            &[Grass, Psychic, Dark],
            &[Fighting, Flying, Poison, Ghost, Steel, Fire, Fairy],
            &[],
        ),
        (Ghost, &[Ghost, Psychic], &[Dark], &[Normal]),
        (
            Steel,
            &[Rock, Ice, Fairy],
            &[Steel, Fire, Water, Electric],
            &[],
        ),
        (
            Fire,
            &[Bug, Steel, Grass, Ice],
            &[Rock, Fire, Water, Dragon],
            &[],
        ),
        (Water, &[Ground, Rock, Fire], &[Water, Grass, Dragon], &[]),
        (
            Grass,
            &[Ground, Rock, Water],
            &[Flying, Poison, Bug, Steel, Fire, Grass, Dragon],
            &[],
        ),
        (
            Electric,
            &[Flying, Water],
            &[Grass, Electric, Dragon],
            &[Ground],
        ),
        (Psychic, &[Fighting, Poison], &[Steel, Psychic], &[Dark]),
        (
            Ice,
            &[Flying, Ground, Grass, Dragon],
            &[Steel, Fire, Water, Ice],
            &[],
        ),
        (Dragon, &[Dragon], &[Steel], &[Fairy]),
        (Dark, &[Ghost, Psychic], &[Fighting, Dark, Fairy], &[]),
        (
            Fairy,
            &[Fighting, Dragon, Dark],
            &[Poison, Steel, Fire],
            &[],
        ),
    ];

    let mut chart = HashMap::new();
    for &(attacker, strong, weak, immune) in rows {
        for &def in strong {
            chart.insert((attacker, def), 2.0);
        }
        for &def in weak {
            chart.insert((attacker, def), 0.5);
        }
        for &def in immune {
            chart.insert((attacker, def), 0.0);
        }
    }
    chart
}
