use std::fmt::{Display, Formatter};
use log::warn;
use crate::consts::{NUM_ENCODED_PROMOTIONS, NUM_FROM_TO_MOVES, NUM_MOVES, NUM_SQUARES};
use crate::r#move::Move;
use crate::utils::{PromotionPieceType, Square};

/// What a policy slot stands for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PolicySlot {
    FromTo { source: Square, destination: Square },
    /// Knight or queen promotion onto a file, whatever the source square.
    Promotion { destination_file: u8, promotion: PromotionPieceType },
}

impl PolicySlot {
    pub fn matches(&self, mv: &Move) -> bool {
        PolicyIndex::from_move(mv).slot() == *self
    }
}

impl Display for PolicySlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicySlot::FromTo { source, destination } => write!(f, "{}{}", source, destination),
            PolicySlot::Promotion { destination_file, promotion } => {
                write!(f, "{}-file={}", (b'a' + destination_file) as char, promotion.to_char().to_ascii_uppercase())
            }
        }
    }
}

/// Index into the `num_moves` wide policy output.
///
/// Plain moves use `from * 64 + to`. Knight and queen promotions use one of
/// the 16 trailing slots, keyed by destination file. Bishop and rook
/// promotions share the plain slot of their squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct PolicyIndex(usize);

impl PolicyIndex {
    pub const fn new(index: usize) -> Option<PolicyIndex> {
        if index < NUM_MOVES as usize {
            Some(PolicyIndex(index))
        } else {
            None
        }
    }

    pub const fn from_move(mv: &Move) -> PolicyIndex {
        match mv.promotion {
            Some(PromotionPieceType::Knight) => PolicyIndex::promotion(mv.destination.get_file(), 0),
            Some(PromotionPieceType::Queen) => PolicyIndex::promotion(mv.destination.get_file(), 1),
            _ => PolicyIndex(mv.source.index() as usize * NUM_SQUARES as usize + mv.destination.index() as usize),
        }
    }

    const fn promotion(destination_file: u8, kind: usize) -> PolicyIndex {
        PolicyIndex(NUM_FROM_TO_MOVES as usize + destination_file as usize * NUM_ENCODED_PROMOTIONS as usize + kind)
    }

    pub const fn index(&self) -> usize {
        self.0
    }

    pub fn slot(&self) -> PolicySlot {
        if self.0 < NUM_FROM_TO_MOVES as usize {
            let source = Square::from_index((self.0 / NUM_SQUARES as usize) as u8);
            let destination = Square::from_index((self.0 % NUM_SQUARES as usize) as u8);
            match (source, destination) {
                (Some(source), Some(destination)) => PolicySlot::FromTo { source, destination },
                _ => unreachable!("from-to index below 4096 always decodes"),
            }
        } else {
            let offset = self.0 - NUM_FROM_TO_MOVES as usize;
            let promotion = match offset % NUM_ENCODED_PROMOTIONS as usize {
                0 => PromotionPieceType::Knight,
                _ => PromotionPieceType::Queen,
            };
            PolicySlot::Promotion {
                destination_file: (offset / NUM_ENCODED_PROMOTIONS as usize) as u8,
                promotion,
            }
        }
    }
}

/// Dense policy target from `(move, probability)` pairs. Moves sharing a slot
/// add up.
pub fn policy_target(policy: &[(Move, f32)]) -> Vec<f32> {
    let mut target = vec![0.; NUM_MOVES as usize];
    for (mv, prob) in policy {
        target[PolicyIndex::from_move(mv).index()] += *prob;
    }
    target
}

/// Restricts a policy row to `moves` and renormalizes over them. If the network
/// puts no mass on any of them the priors fall back to uniform.
pub fn legal_priors(policy_row: &[f32], moves: &[Move]) -> Vec<(Move, f32)> {
    let mut priors: Vec<(Move, f32)> = moves
        .iter()
        .map(|mv| {
            let prior = policy_row.get(PolicyIndex::from_move(mv).index()).copied().unwrap_or(0.);
            (*mv, prior.max(0.))
        })
        .collect();

    let sum: f32 = priors.iter().map(|(_, prior)| prior).sum();
    if sum > 0. {
        for (_, prior) in priors.iter_mut() {
            *prior /= sum;
        }
    } else if !priors.is_empty() {
        warn!("policy puts no mass on any of {} moves, using uniform priors", priors.len());
        let uniform = 1. / priors.len() as f32;
        for (_, prior) in priors.iter_mut() {
            *prior = uniform;
        }
    }
    priors
}

/// The `n` most probable slots of a policy row, most probable first.
pub fn top_slots(policy_row: &[f32], n: usize) -> Vec<(PolicySlot, f32)> {
    let mut indexed: Vec<(usize, f32)> = policy_row.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed
        .into_iter()
        .take(n)
        .filter_map(|(index, prob)| PolicyIndex::new(index).map(|index| (index.slot(), prob)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn test_from_to_index() {
        assert_eq!(PolicyIndex::from_move(&mv("a1b1")).index(), 1);
        assert_eq!(PolicyIndex::from_move(&mv("e2e4")).index(), 12 * 64 + 28);
        assert_eq!(PolicyIndex::from_move(&mv("h8g8")).index(), 63 * 64 + 62);

        for source in Square::iter_all() {
            for destination in Square::iter_all().filter(|&destination| destination != source) {
                let index = PolicyIndex::from_move(&Move::new(source, destination));
                assert_eq!(index.index(), source.index() as usize * 64 + destination.index() as usize);
                assert_eq!(index.slot(), PolicySlot::FromTo { source, destination });
            }
        }
    }

    #[test]
    fn test_promotion_index() {
        assert_eq!(PolicyIndex::from_move(&mv("a7a8n")).index(), 4096);
        assert_eq!(PolicyIndex::from_move(&mv("a7a8q")).index(), 4097);
        assert_eq!(PolicyIndex::from_move(&mv("h2h1q")).index(), 4111);
        assert_eq!(
            PolicyIndex::from_move(&mv("e7d8n")).slot(),
            PolicySlot::Promotion { destination_file: 3, promotion: PromotionPieceType::Knight }
        );
        // captures and pushes onto the same file share a slot
        assert_eq!(PolicyIndex::from_move(&mv("e7d8q")), PolicyIndex::from_move(&mv("d7d8q")));
    }

    #[test]
    fn test_unencoded_promotions_use_plain_slot() {
        assert_eq!(PolicyIndex::from_move(&mv("e7e8r")), PolicyIndex::from_move(&mv("e7e8")));
        assert_eq!(PolicyIndex::from_move(&mv("e7e8b")).index(), 52 * 64 + 60);
        assert!(PolicySlot::FromTo { source: Square::E7, destination: Square::E8 }.matches(&mv("e7e8r")));
        assert!(!PolicySlot::FromTo { source: Square::E7, destination: Square::E8 }.matches(&mv("e7e8q")));
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(PolicyIndex::new(4111).map(|index| index.index()), Some(4111));
        assert_eq!(PolicyIndex::new(4112), None);
    }

    #[test]
    fn test_policy_target() {
        let target = policy_target(&[(mv("e2e4"), 0.75), (mv("d7d8q"), 0.125), (mv("e7d8q"), 0.125)]);
        assert_eq!(target.len(), NUM_MOVES as usize);
        assert_eq!(target[PolicyIndex::from_move(&mv("e2e4")).index()], 0.75);
        assert_eq!(target[4096 + 3 * 2 + 1], 0.25);
        assert!((target.iter().sum::<f32>() - 1.).abs() < 1e-6);
    }

    #[test]
    fn test_legal_priors() {
        let mut row = vec![0.; NUM_MOVES as usize];
        row[PolicyIndex::from_move(&mv("e2e4")).index()] = 0.3;
        row[PolicyIndex::from_move(&mv("d2d4")).index()] = 0.1;
        row[PolicyIndex::from_move(&mv("a2a3")).index()] = 0.6; // not offered

        let priors = legal_priors(&row, &[mv("e2e4"), mv("d2d4")]);
        assert_eq!(priors.len(), 2);
        assert!((priors[0].1 - 0.75).abs() < 1e-6);
        assert!((priors[1].1 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_legal_priors_without_mass() {
        let row = vec![0.; NUM_MOVES as usize];
        let priors = legal_priors(&row, &[mv("e2e4"), mv("d2d4"), mv("g1f3"), mv("b1c3")]);
        assert!(priors.iter().all(|(_, prior)| *prior == 0.25));
        assert!(legal_priors(&row, &[]).is_empty());
    }

    #[test]
    fn test_top_slots() {
        let mut row = vec![0.; NUM_MOVES as usize];
        row[PolicyIndex::from_move(&mv("g1f3")).index()] = 0.5;
        row[4097] = 0.4;
        let top = top_slots(&row, 2);
        assert_eq!(top[0].0, PolicySlot::FromTo { source: Square::from_name("g1").unwrap(), destination: Square::from_name("f3").unwrap() });
        assert_eq!(top[1], (PolicySlot::Promotion { destination_file: 0, promotion: PromotionPieceType::Queen }, 0.4));
        assert_eq!(top[0].0.to_string(), "g1f3");
        assert_eq!(top[1].0.to_string(), "a-file=Q");
    }
}
