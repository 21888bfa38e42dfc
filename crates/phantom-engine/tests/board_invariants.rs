use phantom_engine::{
    Block, BlockSeed, BlockType, Board, BoardConfig, GameSession, GridPosition, MatchDetector,
    SettleStep, TileGrid as _,
};

const NON_RED: [BlockType; 5] = [
    BlockType::Green,
    BlockType::Blue,
    BlockType::Yellow,
    BlockType::Purple,
    BlockType::Orange,
];

fn assert_slots_consistent(board: &Board) {
    for position in board.positions() {
        let block = board
            .block_at(position)
            .unwrap_or_else(|| panic!("empty slot at {position}"));
        assert_eq!(block.position(), position);
        assert!(!block.kind().is_none());
    }
    assert!(board.is_consistent());
}

#[test]
fn single_red_run_flags_exactly_its_cells() {
    let reds = [
        GridPosition::new(1, 0),
        GridPosition::new(2, 0),
        GridPosition::new(3, 0),
    ];
    // Neighbouring cells always differ, so no other run can form
    let board = Board::from_fn(&BoardConfig::with_size(6, 6), |p| {
        if reds.contains(&p) {
            BlockType::Red
        } else {
            NON_RED[usize::try_from(p.x + 2 * p.y).unwrap() % NON_RED.len()]
        }
    })
    .unwrap();

    let detector = MatchDetector::for_board(&board);
    for position in board.positions() {
        assert_eq!(
            detector.is_match(&board, position),
            reds.contains(&position),
            "{position}"
        );
    }
    assert_eq!(
        detector.find_matches(&board).into_iter().collect::<Vec<_>>(),
        reds
    );
}

#[test]
fn out_of_range_reads_are_empty() {
    let board = Board::from_rows(&BoardConfig::default(), &["RGB", "GBR"]).unwrap();
    for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MIN, i32::MAX)] {
        assert_eq!(board.get(x, y), BlockType::None);
        assert!(board.block(x, y).is_none());
        assert!(!board.contains(GridPosition::new(x, y)));
    }
}

#[test]
fn out_of_range_writes_fail_without_side_effects() {
    let mut board = Board::from_rows(&BoardConfig::default(), &["RGB", "GBR"]).unwrap();
    let before = board.snapshot();
    for (x, y) in [(-1, 0), (3, 1), (0, 2)] {
        let block = Block::new(BlockType::Orange, GridPosition::new(x, y));
        assert!(!board.set(x, y, block));
    }
    assert_eq!(board.snapshot(), before);
    assert_slots_consistent(&board);
}

#[test]
fn swaps_keep_slots_consistent() {
    let mut board = Board::from_rows(&BoardConfig::default(), &["RGBY", "GBYR", "BYRG"]).unwrap();
    let pairs = [
        ((0, 0), (1, 0)),
        ((1, 0), (1, 1)),
        ((3, 2), (3, 1)),
        ((2, 1), (1, 1)),
    ];
    for ((ax, ay), (bx, by)) in pairs {
        let (a, b) = (GridPosition::new(ax, ay), GridPosition::new(bx, by));
        let (kind_a, kind_b) = (board.kind_at(a), board.kind_at(b));
        assert!(board.swap(a, b));
        assert_eq!((board.kind_at(a), board.kind_at(b)), (kind_b, kind_a));
        assert_slots_consistent(&board);
        board.complete_all_motions();
    }
    assert!(!board.swap(GridPosition::new(0, 0), GridPosition::new(2, 0)));
    assert!(!board.swap(GridPosition::new(0, 0), GridPosition::new(1, 1)));
    assert_slots_consistent(&board);
}

#[test]
fn untyped_blocks_are_never_stored() {
    let mut board = Board::from_rows(&BoardConfig::default(), &["RGB", "GBR"]).unwrap();
    for position in board.positions().collect::<Vec<_>>() {
        let block = Block::new(BlockType::None, position);
        assert!(!board.set(position.x, position.y, block));
    }
    assert!(board.blocks().all(|block| !block.kind().is_none()));
    assert_slots_consistent(&board);
}

#[test]
fn seeded_play_keeps_slots_consistent() {
    let config = BoardConfig::with_size(7, 7);
    let mut session = GameSession::with_seed(&config, BlockSeed::from_bytes([9; 16])).unwrap();
    assert_slots_consistent(session.board());

    for _ in 0..25 {
        let hint = session.hint().expect("session keeps the board playable");
        session.try_swap(hint.from, hint.to).unwrap();
        let mut settled = false;
        for _ in 0..2000 {
            let step = session.tick(1.0 / 30.0);
            assert_slots_consistent(session.board());
            if let SettleStep::Settled { chain } = step {
                assert!(chain >= 1);
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!(session.input_enabled());
        assert!(!MatchDetector::for_board(session.board()).has_matches(session.board()));
    }
    assert_eq!(session.stats().swaps(), 25);
    assert_eq!(session.stats().unproductive_swaps(), 0);
}
