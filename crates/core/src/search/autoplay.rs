//! Randomized best-move search for the built-in opponent

use std::collections::{HashMap, HashSet, VecDeque};

use rand::Rng;

use crate::board::{Color, PieceKind, Snapshot};
use crate::error::{Error, Result};
use crate::notation;
use crate::rules::{apply_move, is_in_checkmate, moves_for, CheckFilter};

/// Expanding a position costs one step; requeueing an unexpanded one costs
/// [`REQUEUE_STEP`]. The search stops when the budget runs out.
const STEP_BUDGET: f64 = 2500.0;
const REQUEUE_STEP: f64 = 0.1;
/// Per-depth probability increment of skipping an expansion. Past depth ten
/// nothing expands anymore, only terminals accumulate.
const DEPTH_THROTTLE: f64 = 0.1;
/// Fraction of non-best children that still enter the frontier, keeping it
/// diverse without exploding combinatorially.
const FRONTIER_SAMPLE: f64 = 0.25;
/// Stands in for "the game ended here", dwarfing any material swing.
const TERMINAL_SCORE: i32 = 100_000;

/// One hypothetical future reachable from the root position. `board` is
/// `None` once the game ended there. Scores are material differentials from
/// the root mover's perspective.
struct Eventuality {
    board: Option<Snapshot>,
    score: i32,
    parent_score: i32,
    turn: Color,
    root_note: String,
    depth: u32,
}

/// The scoring facts of an eventuality, kept after its board is gone.
struct Record {
    score: i32,
    parent_score: i32,
    turn: Color,
    root_note: String,
    depth: u32,
    terminal: bool,
}

/// Picks a move for `root` to play from `snap`, returned as the notation
/// string that produced the best-averaged futures.
///
/// This is a budgeted breadth-first exploration, not a minimax: expansion
/// order and frontier sampling are randomized, and score ties resolve to
/// whichever candidate is seen last. Two runs from the same position may
/// pick different moves. Errs with [`Error::GameOver`] when `root` has no
/// legal move at all.
pub fn choose_move(snap: &Snapshot, root: Color) -> Result<String> {
    if is_in_checkmate(snap, root)? {
        return Err(Error::GameOver);
    }

    let mut rng = rand::rng();
    let mut queue: VecDeque<Eventuality> = VecDeque::new();
    let mut records: Vec<Record> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    queue.push_back(Eventuality {
        board: Some(snap.duplicate()),
        score: snap.score_diff(root),
        parent_score: 0,
        turn: root,
        root_note: String::new(),
        depth: 0,
    });

    let mut steps = 0.0_f64;
    while steps < STEP_BUDGET {
        let Some(ev) = queue.pop_front() else {
            break;
        };
        let throttle = (DEPTH_THROTTLE * f64::from(ev.depth)).min(1.0);
        if ev.board.is_none() || rng.random_bool(throttle) {
            steps += REQUEUE_STEP;
            queue.push_back(ev);
            continue;
        }
        steps += 1.0;

        let board = ev.board.as_ref().ok_or_else(|| {
            Error::Search("expanding a terminal eventuality".to_string())
        })?;
        let mover = ev.turn;
        let sign = if mover == root { 1 } else { -1 };
        let mut children: Vec<(i32, Eventuality)> = Vec::new();
        let mut best: Option<i32> = None;
        let mut any_move = false;

        for piece in board.pieces().filter(|p| p.color == mover) {
            for mut mv in moves_for(board, piece.square, CheckFilter::Enabled)? {
                any_move = true;
                // The search never waits on a promotion choice.
                if mv.is_promotion && mv.promote_to.is_none() {
                    mv.promote_to = Some(PieceKind::Queen);
                }
                let mut after = board.duplicate();
                apply_move(&mut after, piece.square, &mv);
                let score = after.score_diff(root);
                let root_note = if ev.depth == 0 {
                    notation::move_as_notation(piece.square, &mv, board, &after)?
                } else {
                    ev.root_note.clone()
                };
                // Transpositions reached through the same root move are
                // explored once.
                if !seen.insert(format!("{root_note}|{}", after.board_key())) {
                    continue;
                }
                records.push(Record {
                    score,
                    parent_score: ev.score,
                    turn: mover.opponent(),
                    root_note: root_note.clone(),
                    depth: ev.depth + 1,
                    terminal: false,
                });
                let signed = score * sign;
                best = Some(best.map_or(signed, |b| b.max(signed)));
                children.push((
                    signed,
                    Eventuality {
                        board: Some(after),
                        score,
                        parent_score: ev.score,
                        turn: mover.opponent(),
                        root_note,
                        depth: ev.depth + 1,
                    },
                ));
            }
        }

        if !any_move {
            // Checkmate or stalemate for `mover`; either ends the game.
            let score = if mover == root {
                -TERMINAL_SCORE
            } else {
                TERMINAL_SCORE
            };
            records.push(Record {
                score,
                parent_score: ev.score,
                turn: root,
                root_note: ev.root_note.clone(),
                depth: ev.depth + 1,
                terminal: true,
            });
            queue.push_back(Eventuality {
                board: None,
                score,
                parent_score: ev.score,
                turn: root,
                root_note: ev.root_note,
                depth: ev.depth + 1,
            });
            continue;
        }

        for (signed, child) in children {
            if Some(signed) == best || rng.random_bool(FRONTIER_SAMPLE) {
                queue.push_back(child);
            }
        }
    }

    pick_best(&records, root)
}

/// Buckets the deepest futures (and every terminal one) by root move and
/// averages each bucket from the root mover's perspective.
fn pick_best(records: &[Record], root: Color) -> Result<String> {
    let max_depth = records.iter().map(|r| r.depth).max().unwrap_or(0);
    let mut buckets: HashMap<&str, (f64, u32)> = HashMap::new();
    for record in records {
        if record.root_note.is_empty() {
            continue;
        }
        if !record.terminal && record.depth + 1 < max_depth {
            continue;
        }
        let contribution = if record.turn == root {
            record.score
        } else {
            record.parent_score
        };
        let entry = buckets.entry(record.root_note.as_str()).or_insert((0.0, 0));
        entry.0 += f64::from(contribution);
        entry.1 += 1;
    }

    let mut choice: Option<(&str, f64)> = None;
    for (note, (sum, count)) in &buckets {
        let avg = sum / f64::from(*count);
        match choice {
            Some((_, best)) if avg < best => {}
            _ => choice = Some((note, avg)),
        }
    }
    choice
        .map(|(note, _)| note.to_string())
        .ok_or_else(|| Error::Search("no candidate move found".to_string()))
}

/// Runs [`choose_move`] on a blocking worker so callers on an async runtime
/// are not stalled for the duration of the search.
pub async fn choose_move_async(snap: Snapshot, root: Color) -> Result<String> {
    tokio::task::spawn_blocking(move || choose_move(&snap, root))
        .await
        .map_err(|e| Error::Search(format!("worker panicked: {e}")))?
}
