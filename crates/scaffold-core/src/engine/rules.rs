//! Prioritization rules that pick one ring to remove per step.
//!
//! Each rule narrows the list of admissible removals and never empties it: when a
//! rule rejects every candidate, the list is left unchanged. The cascade stops at
//! the first rule that leaves exactly one candidate.

use super::config::ScaffoldConfig;
use super::extraction::framework_atoms;
use super::removal::RingRemoval;
use crate::core::models::element::{NITROGEN, OXYGEN, SULFUR};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::perception::rings::{Ring, RingInfo};
use std::collections::HashSet;
use tracing::debug;

/// Rings of this size or larger are macrocycles for rule 2.
const MACROCYCLE_SIZE: usize = 12;

/// Reported when a single removal was admissible and no rule had to choose.
const UNCONTESTED: u8 = 0;
/// The smallest parent identity settles what the twelve rules left open.
const FALLBACK_RULE: u8 = 13;

/// A removal under evaluation with the perception data the rules consult.
struct Candidate {
    removal: RingRemoval,
    parent_info: RingInfo,
}

/// The child scaffold the candidates were derived from.
struct Child<'a> {
    molecule: &'a Molecule,
    info: RingInfo,
    framework: HashSet<AtomId>,
}

type Rule = fn(&Child, Vec<Candidate>, &ScaffoldConfig) -> Vec<Candidate>;

const RULES: [(u8, Rule); 12] = [
    (1, rule_three_membered_heterocycles),
    (2, rule_no_macrocycles),
    (3, rule_fewest_linker_bonds),
    (4, rule_ring_fusion_delta),
    (5, rule_bridged_over_spiro),
    (6, rule_small_common_rings),
    (7, rule_keep_aromatic_systems),
    (8, rule_fewest_heteroatoms),
    (9, rule_heteroatom_profile),
    (10, rule_smaller_rings),
    (11, rule_non_aromatic_rings),
    (12, rule_heteroatom_linker_attachment),
];

/// Picks the removal to apply next among the admissible removals of `child`.
///
/// Returns `None` when `removals` is empty.
pub fn select_removal(
    child: &Molecule,
    removals: Vec<RingRemoval>,
    config: &ScaffoldConfig,
) -> Option<RingRemoval> {
    run_cascade(child, removals, config).map(|(_, removal)| removal)
}

/// Runs the rules in order and returns the chosen removal together with the
/// number of the rule that made the choice.
fn run_cascade(
    child: &Molecule,
    removals: Vec<RingRemoval>,
    config: &ScaffoldConfig,
) -> Option<(u8, RingRemoval)> {
    if removals.len() <= 1 {
        return removals.into_iter().next().map(|r| (UNCONTESTED, r));
    }

    let info = RingInfo::perceive(child);
    let framework = framework_atoms(child, &info);
    let child = Child {
        molecule: child,
        info,
        framework,
    };
    let mut candidates: Vec<Candidate> = removals
        .into_iter()
        .map(|removal| Candidate {
            parent_info: RingInfo::perceive(&removal.parent),
            removal,
        })
        .collect();

    for (number, rule) in RULES {
        candidates = rule(&child, candidates, config);
        if candidates.len() == 1 {
            debug!(rule = number, "Prioritization rule selected the ring to remove");
            return candidates.pop().map(|c| (number, c.removal));
        }
    }

    debug!(
        remaining = candidates.len(),
        rule = FALLBACK_RULE,
        "Falling back to the smallest parent identity"
    );
    candidates
        .into_iter()
        .min_by(|a, b| a.removal.parent_identity.cmp(&b.removal.parent_identity))
        .map(|c| (FALLBACK_RULE, c.removal))
}

/// Keeps the candidates matching `predicate`, unless none does.
fn keep_matching(candidates: Vec<Candidate>, predicate: impl Fn(&Candidate) -> bool) -> Vec<Candidate> {
    if candidates.iter().any(&predicate) {
        candidates.into_iter().filter(|c| predicate(c)).collect()
    } else {
        candidates
    }
}

/// Keeps the candidates whose key equals the smallest key.
fn keep_min_by_key<K: Ord>(candidates: Vec<Candidate>, key: impl Fn(&Candidate) -> K) -> Vec<Candidate> {
    let Some(best) = candidates.iter().map(&key).min() else {
        return candidates;
    };
    candidates.into_iter().filter(|c| key(c) == best).collect()
}

fn heteroatom_count(molecule: &Molecule, ring: &Ring) -> usize {
    ring.atoms
        .iter()
        .filter(|&&a| molecule.atom(a).is_some_and(|atom| atom.is_heteroatom()))
        .count()
}

fn is_aromatic_ring(molecule: &Molecule, ring: &Ring) -> bool {
    ring.atoms
        .iter()
        .all(|&a| molecule.atom(a).is_some_and(|atom| atom.aromatic))
}

/// Rule 1: three-membered heterocycles (epoxides, aziridines) go first.
fn rule_three_membered_heterocycles(
    child: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_matching(candidates, |c| {
        c.removal.ring.size() == 3 && heteroatom_count(child.molecule, &c.removal.ring) > 0
    })
}

/// Rule 2: macrocycles are kept while smaller rings can be removed.
fn rule_no_macrocycles(_: &Child, candidates: Vec<Candidate>, _: &ScaffoldConfig) -> Vec<Candidate> {
    keep_matching(candidates, |c| c.removal.ring.size() < MACROCYCLE_SIZE)
}

/// Acyclic bonds of the Murcko framework of a parent scaffold.
fn linker_bond_count(candidate: &Candidate) -> usize {
    let parent = &candidate.removal.parent;
    let framework = framework_atoms(parent, &candidate.parent_info);
    parent
        .bonds_iter()
        .filter(|(id, bond)| {
            !candidate.parent_info.is_ring_bond(*id)
                && framework.contains(&bond.atom1_id)
                && framework.contains(&bond.atom2_id)
        })
        .count()
}

/// Rule 3: choose the parent with the fewest acyclic linker bonds.
fn rule_fewest_linker_bonds(
    _: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_min_by_key(candidates, linker_bond_count)
}

/// Δ = nrrb − (nR − 1) of a parent: ring-fusion bonds against ring count.
fn fusion_delta(candidate: &Candidate) -> i64 {
    let info = &candidate.parent_info;
    let fusion_bonds = info
        .ring_bonds()
        .iter()
        .filter(|&&b| info.bond_ring_membership(b) > 1)
        .count() as i64;
    fusion_bonds - (info.ring_count() as i64 - 1)
}

/// Rule 4: choose the parent with the largest |Δ|; positive Δ wins ties.
fn rule_ring_fusion_delta(
    _: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    let candidates = keep_min_by_key(candidates, |c| std::cmp::Reverse(fusion_delta(c).abs()));
    keep_matching(candidates, |c| fusion_delta(c) > 0)
}

/// Atoms shared by three or more rings.
fn bridgehead_count(info: &RingInfo) -> usize {
    info.ring_atoms()
        .iter()
        .filter(|&&a| info.ring_membership(a) >= 3)
        .count()
}

/// Atoms that are the only atom shared by a pair of rings.
fn spiro_count(info: &RingInfo) -> usize {
    let rings = info.rings();
    let mut spiro: HashSet<AtomId> = HashSet::new();
    for (i, first) in rings.iter().enumerate() {
        for second in &rings[i + 1..] {
            if first.shared_atoms(second) != 1 {
                continue;
            }
            if let Some(&atom) = first.atoms.iter().find(|&&a| second.contains_atom(a)) {
                spiro.insert(atom);
            }
        }
    }
    spiro.len()
}

/// Rule 5: prefer parents with bridged systems over spiro systems.
fn rule_bridged_over_spiro(
    _: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    let candidates = keep_min_by_key(candidates, |c| {
        std::cmp::Reverse(bridgehead_count(&c.parent_info))
    });
    keep_min_by_key(candidates, |c| spiro_count(&c.parent_info))
}

/// Rule 6: remove 3-, 5- and 6-membered rings before other sizes.
fn rule_small_common_rings(
    _: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_matching(candidates, |c| matches!(c.removal.ring.size(), 3 | 5 | 6))
}

/// Whether removing the ring breaks the aromaticity of a fully aromatic system.
fn dissects_aromatic_system(child: &Child, candidate: &Candidate) -> bool {
    let ring = &candidate.removal.ring;
    let Some(system) = child
        .info
        .ring_systems()
        .iter()
        .find(|s| ring.atoms.iter().any(|a| s.contains(a)))
    else {
        return false;
    };
    let fully_aromatic = system
        .iter()
        .all(|&a| child.molecule.atom(a).is_some_and(|atom| atom.aromatic));
    if !fully_aromatic {
        return false;
    }
    let parent = &candidate.removal.parent;
    system
        .iter()
        .filter(|&&a| candidate.parent_info.is_ring_atom(a))
        .any(|&a| parent.atom(a).is_some_and(|atom| !atom.aromatic))
}

/// Rule 7: a fully aromatic ring system must stay aromatic in the parent.
fn rule_keep_aromatic_systems(
    child: &Child,
    candidates: Vec<Candidate>,
    config: &ScaffoldConfig,
) -> Vec<Candidate> {
    if !config.apply_rule_seven || !config.determine_aromaticity {
        return candidates;
    }
    keep_matching(candidates, |c| !dissects_aromatic_system(child, c))
}

/// Rule 8: remove the ring with the fewest heteroatoms.
fn rule_fewest_heteroatoms(
    child: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_min_by_key(candidates, |c| heteroatom_count(child.molecule, &c.removal.ring))
}

/// Rule 9: nitrogen rings are retained over oxygen rings over sulfur rings.
fn rule_heteroatom_profile(
    child: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_min_by_key(candidates, |c| {
        let count = |number: u8| {
            c.removal
                .ring
                .atoms
                .iter()
                .filter(|&&a| {
                    child
                        .molecule
                        .atom(a)
                        .is_some_and(|atom| atom.element.atomic_number == number)
                })
                .count()
        };
        (
            count(NITROGEN.atomic_number),
            count(OXYGEN.atomic_number),
            count(SULFUR.atomic_number),
        )
    })
}

/// Rule 10: remove smaller rings first.
fn rule_smaller_rings(_: &Child, candidates: Vec<Candidate>, _: &ScaffoldConfig) -> Vec<Candidate> {
    keep_min_by_key(candidates, |c| c.removal.ring.size())
}

/// Rule 11: remove non-aromatic rings first.
fn rule_non_aromatic_rings(
    child: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_matching(candidates, |c| !is_aromatic_ring(child.molecule, &c.removal.ring))
}

/// Whether a ring heteroatom carries a linker atom outside all rings.
fn has_heteroatom_linker_attachment(child: &Child, ring: &Ring) -> bool {
    ring.atoms.iter().any(|&a| {
        child.molecule.atom(a).is_some_and(|atom| atom.is_heteroatom())
            && child.molecule.neighbors(a).iter().any(|&(n, _)| {
                !ring.contains_atom(n) && !child.info.is_ring_atom(n) && child.framework.contains(&n)
            })
    })
}

/// Rule 12: remove rings attached to a linker through a heteroatom first.
fn rule_heteroatom_linker_attachment(
    child: &Child,
    candidates: Vec<Candidate>,
    _: &ScaffoldConfig,
) -> Vec<Candidate> {
    keep_matching(candidates, |c| has_heteroatom_linker_attachment(child, &c.removal.ring))
}
