//! Four-piece jigsaw over a generated picture.

use super::{Action, Rejection, Round, Verdict};
use crate::content::ImageRef;
use crate::shuffle::GardenRng;

pub const IMAGE_PROMPT: &str = "A cute 3d cartoon animal in a forest. High quality, vivid colors.";

pub const PIECES: usize = 4;

#[derive(Debug, Clone)]
pub struct PuzzleRound {
    image: ImageRef,
    /// Pieces not yet placed, in tray order.
    tray: Vec<usize>,
    /// `board[slot]` holds the piece placed there.
    board: [Option<usize>; PIECES],
}

impl PuzzleRound {
    pub fn generate(image: ImageRef, rng: &mut GardenRng) -> Self {
        let pieces: Vec<usize> = (0..PIECES).collect();
        Self {
            image,
            tray: rng.shuffled(&pieces),
            board: [None; PIECES],
        }
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn tray(&self) -> &[usize] {
        &self.tray
    }

    pub fn board(&self) -> &[Option<usize>] {
        &self.board
    }
}

impl Round for PuzzleRound {
    fn evaluate(&mut self, action: &Action) -> Verdict {
        let Action::DropPiece { piece, slot } = action else {
            return Verdict::Rejected(Rejection::WrongGame);
        };
        let (piece, slot) = (*piece, *slot);
        if piece >= PIECES || slot >= PIECES {
            return Verdict::Rejected(Rejection::Invalid);
        }
        if !self.tray.contains(&piece) {
            return Verdict::Rejected(Rejection::AlreadyDone);
        }
        if piece != slot {
            return Verdict::Rejected(Rejection::WrongSlot);
        }
        self.tray.retain(|&p| p != piece);
        self.board[slot] = Some(piece);

        if self.tray.is_empty() {
            Verdict::Win
        } else {
            Verdict::Progress
        }
    }

    fn host_message(&self) -> String {
        "Parçaları sürükleyip yerine koy!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> PuzzleRound {
        PuzzleRound::generate(ImageRef::new("fox"), &mut GardenRng::seeded(6))
    }

    #[test]
    fn test_tray_holds_every_piece() {
        let round = round();
        let mut tray = round.tray().to_vec();
        tray.sort();
        assert_eq!(tray, [0, 1, 2, 3]);
        assert!(round.board().iter().all(Option::is_none));
    }

    #[test]
    fn test_wrong_slot_is_a_no_op() {
        let mut round = round();
        assert_eq!(
            round.evaluate(&Action::DropPiece { piece: 0, slot: 2 }),
            Verdict::Rejected(Rejection::WrongSlot)
        );
        assert_eq!(round.tray().len(), PIECES);
        assert!(round.board().iter().all(Option::is_none));
    }

    #[test]
    fn test_place_all_wins() {
        let mut round = round();
        for piece in 0..PIECES - 1 {
            assert_eq!(
                round.evaluate(&Action::DropPiece { piece, slot: piece }),
                Verdict::Progress
            );
        }
        assert_eq!(
            round.evaluate(&Action::DropPiece { piece: 1, slot: 1 }),
            Verdict::Rejected(Rejection::AlreadyDone)
        );
        assert_eq!(
            round.evaluate(&Action::DropPiece { piece: 3, slot: 3 }),
            Verdict::Win
        );
        assert_eq!(round.board(), [Some(0), Some(1), Some(2), Some(3)]);
    }
}
