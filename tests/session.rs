/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use qorki::{
    generate, legal_turns, Board, Candidate, Click, Config, Outcome, Player, Rejection, Session,
    Snapshot, Square,
};

fn sq(col: u8, row: u8) -> Square {
    Square::new(col, row)
}

#[test]
fn test_man_capture_scenario() {
    let mut session = Session::from_layout("8/8/8/8/8/2o5/1x6/8").unwrap();

    assert_eq!(session.select_or_move(sq(1, 6)), Click::Selected(sq(1, 6)));
    let candidates = session.candidates().to_vec();
    assert!(candidates.contains(&Candidate::capture(sq(3, 4), sq(2, 5))));
    assert!(candidates.contains(&Candidate::quiet(sq(0, 5))));
    assert!(candidates.iter().all(|c| c.to() != sq(2, 5)));

    let Click::TurnEnded(record) = session.select_or_move(sq(3, 4)) else {
        panic!("Expected the capture to end the turn");
    };
    assert_eq!(record.captured, Some(sq(2, 5)));
    assert_eq!(session.board().piece_at(sq(2, 5)), None);
    assert_eq!(session.scores(), (1, 0));
    assert!(!session.is_capturing());
    assert_eq!(session.outcome(), Outcome::Win(Player::First));
}

#[test]
fn test_king_capture_scenario() {
    let board = Board::from_layout("X7/8/2o5/8/4o3/8/8/8").unwrap();
    let candidates = generate(&board, sq(0, 0), false);

    let captures = candidates
        .iter()
        .filter(|c| c.is_capture())
        .copied()
        .collect::<Vec<_>>();
    assert_eq!(captures, [Candidate::capture(sq(3, 3), sq(2, 2))]);
    assert!(candidates.find(sq(5, 5)).is_none());
}

#[test]
fn test_after_capture_men_never_step() {
    let session = Session::default();
    for (square, _) in session.board().pieces() {
        assert!(generate(session.board(), square, true)
            .iter()
            .all(Candidate::is_capture));
    }
}

#[test]
fn test_selection_flow() {
    let mut session = Session::default();

    // Opponent pieces and empty cells cannot be selected
    assert_eq!(
        session.select_or_move(sq(1, 2)),
        Click::Rejected(Rejection::InvalidSelection)
    );
    assert_eq!(session.selected(), None);

    session.select_or_move(sq(2, 5));
    assert_eq!(session.selected(), Some(sq(2, 5)));

    // A far-away cell drops the selection
    assert_eq!(
        session.select_or_move(sq(7, 0)),
        Click::Rejected(Rejection::IllegalDestination)
    );
    assert_eq!(session.selected(), None);
    assert_eq!(session.current_player(), Player::First);
}

#[test]
fn test_turns_alternate_and_scores_match_captures() {
    let mut session = Session::default();
    let start_total = session.board().total();

    for i in 0..200 {
        if session.outcome().is_over() {
            break;
        }

        let mover = session.current_player();
        let turns = legal_turns(&session);
        assert!(!turns.is_empty(), "Ongoing game with no turns:\n{session}");

        // Replay the chosen turn click by click
        let (turn, expected) = &turns[(i * 7) % turns.len()];
        for square in turn.path() {
            assert!(!matches!(
                session.select_or_move(*square),
                Click::Rejected(_)
            ));
        }

        assert_eq!(&session, expected);
        assert_eq!(session.current_player(), mover.opponent());
        assert!(!session.is_capturing());

        let (first, second) = session.scores();
        assert_eq!(
            session.board().total() + (first + second) as usize,
            start_total
        );
    }
}

#[test]
fn test_game_over_ignores_clicks() {
    let mut session = Session::from_layout("8/8/8/8/8/2o5/1o6/x7").unwrap();
    assert_eq!(session.outcome(), Outcome::Win(Player::Second));
    let before = session.clone();
    assert_eq!(
        session.select_or_move(sq(0, 7)),
        Click::Rejected(Rejection::GameOver)
    );
    assert_eq!(session, before);
}

#[test]
fn test_large_board() {
    let config = Config::new(16, 7).unwrap();
    let session = Session::new(config).unwrap();
    assert_eq!(session.board().count(Player::First), 56);
    assert_eq!(session.board().count(Player::Second), 56);
    assert_eq!(session.outcome(), Outcome::Ongoing);
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut session = Session::from_layout("8/8/8/4o3/8/2o5/1x6/6x1").unwrap();
    session.select_or_move(sq(1, 6));
    session.select_or_move(sq(3, 4));
    assert!(session.is_capturing());

    let json = session.export_state().to_json().unwrap();
    let mut restored = Session::default();
    restored
        .import_state(Snapshot::from_json(&json).unwrap())
        .unwrap();
    assert_eq!(restored, session);

    // The restored chain still only accepts its capture
    assert_eq!(
        restored.select_or_move(sq(6, 7)),
        Click::Rejected(Rejection::IllegalDestination)
    );
    assert!(matches!(
        restored.select_or_move(sq(5, 2)),
        Click::TurnEnded(_)
    ));
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let mut session = Session::default();
    session.select_or_move(sq(0, 5));
    let before = session.clone();

    let mut snapshot = session.export_state();
    snapshot.rows[0] = String::from("?o.o.o.o");
    assert!(session.import_state(snapshot).is_err());
    assert_eq!(session, before);

    let mut snapshot = session.export_state();
    snapshot.selected = Some(sq(12, 12));
    assert!(session.import_state(snapshot).is_err());
    assert_eq!(session, before);
}
