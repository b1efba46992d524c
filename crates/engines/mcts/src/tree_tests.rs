use super::*;
use make7_core::{legal_moves, Tile};

fn expanded_root() -> (Tree, Vec<Move>) {
    let mut tree = Tree::new(1000);
    let moves = legal_moves(&Position::new());
    tree.expand(ROOT, &moves).unwrap();
    (tree, moves)
}

#[test]
fn test_from_children() {
    use Proven::*;
    assert_eq!(Proven::from_children(std::iter::empty()), Unsolved);
    assert_eq!(Proven::from_children([Unsolved, Loss]), Win);
    assert_eq!(Proven::from_children([Win, Unsolved]), Unsolved);
    assert_eq!(Proven::from_children([Win, Draw, Win]), Draw);
    assert_eq!(Proven::from_children([Win, Win]), Loss);
    assert_eq!(Proven::from_children([Draw, Win, Loss]), Win);
}

#[test]
fn test_to_result() {
    assert_eq!(Proven::Win.to_result().outcome, Outcome::Win);
    assert_eq!(Proven::Loss.to_result().outcome, Outcome::Loss);
    assert_eq!(Proven::Draw.to_result(), GameResult::DRAW);
    assert_eq!(Proven::Unsolved.to_result(), GameResult::UNKNOWN);
}

#[test]
fn test_expand_links_children() {
    let (tree, moves) = expanded_root();
    assert_eq!(tree.len(), 1 + moves.len());
    assert!(tree.root().is_expanded());
    let children = tree.children(ROOT);
    assert_eq!(children.len(), moves.len());
    for (child, mv) in children.iter().zip(&moves) {
        assert_eq!(child.mv, Some(*mv));
        assert_eq!(child.parent, Some(ROOT));
        assert!(!child.is_expanded());
    }
}

#[test]
fn test_expand_respects_node_cap() {
    let mut tree = Tree::new(10);
    let moves = legal_moves(&Position::new());
    assert!(matches!(
        tree.expand(ROOT, &moves),
        Err(Make7Error::NodeAllocation { nodes: 1 })
    ));
    assert_eq!(tree.len(), 1);
    assert!(!tree.root().is_expanded());
}

#[test]
fn test_backpropagate_alternates_sign() {
    let (mut tree, _) = expanded_root();
    let child = tree.root().children().start;
    let moves = legal_moves(&Position::new());
    tree.expand(child, &moves).unwrap();
    let grandchild = tree.node(child).children().start;

    tree.backpropagate(grandchild, 3);
    assert_eq!((tree.node(grandchild).visits, tree.node(grandchild).points), (1, 3));
    assert_eq!((tree.node(child).visits, tree.node(child).points), (1, -3));
    assert_eq!((tree.root().visits, tree.root().points), (1, 3));
}

#[test]
fn test_select_stops_above_unvisited() {
    let (mut tree, _) = expanded_root();
    let first = tree.root().children().start;
    tree.backpropagate(first, 1);

    let mut pos = Position::new();
    assert_eq!(tree.select(&mut pos, std::f64::consts::SQRT_2), ROOT);
    assert_eq!(pos.ply(), 0);
    let unvisited: Vec<_> = tree.unvisited_children(ROOT).collect();
    assert_eq!(unvisited.len(), tree.root().children().len() - 1);
    assert!(!unvisited.contains(&first));
}

#[test]
fn test_select_descends_to_partly_visited_node() {
    let (mut tree, moves) = expanded_root();
    let range = tree.root().children();
    for idx in range.clone() {
        tree.backpropagate(idx, 0);
    }
    let target = range.start + 2;
    tree.backpropagate(target, 10);
    let replies = legal_moves(&Position::from_moves(&moves[2].to_string()).unwrap());
    tree.expand(target, &replies).unwrap();
    let grandchild = tree.node(target).children().start;
    tree.backpropagate(grandchild, -1);

    let mut pos = Position::new();
    assert_eq!(tree.select(&mut pos, 0.5), target);
    assert_eq!(pos.last_move(), Some(moves[2]));
    assert_eq!(tree.unvisited_children(target).count(), replies.len() - 1);
}

#[test]
fn test_unvisited_children_skip_solved() {
    let (mut tree, _) = expanded_root();
    let range = tree.root().children();
    tree.set_proven(range.start, Proven::Win);
    tree.backpropagate(range.start + 1, 1);
    assert_eq!(tree.unvisited_children(ROOT).count(), range.len() - 2);
}

#[test]
fn test_select_uses_uct_and_skips_solved() {
    let (mut tree, moves) = expanded_root();
    let range = tree.root().children();
    for idx in range.clone() {
        tree.backpropagate(idx, -1);
    }
    let good = range.start + 4;
    tree.backpropagate(good, 5);

    let mut pos = Position::new();
    assert_eq!(tree.select(&mut pos, 0.5), good);
    assert_eq!(pos.last_move(), Some(moves[4]));

    tree.set_proven(good, Proven::Win);
    let mut pos = Position::new();
    assert_ne!(tree.select(&mut pos, 0.5), good);
}

#[test]
fn test_select_stops_when_nothing_is_eligible() {
    let (mut tree, _) = expanded_root();
    for idx in tree.root().children() {
        tree.set_proven(idx, Proven::Win);
    }
    let mut pos = Position::new();
    assert_eq!(tree.select(&mut pos, 1.0), ROOT);
    assert_eq!(pos.ply(), 0);
}

#[test]
fn test_refresh_proven_climbs() {
    let (mut tree, _) = expanded_root();
    let child = tree.root().children().start;
    let moves = vec![Move::new(Tile::One, 0), Move::new(Tile::Two, 0)];
    tree.expand(child, &moves).unwrap();
    let grandchildren = tree.node(child).children();

    tree.set_proven(grandchildren.start, Proven::Win);
    tree.refresh_proven(grandchildren.start);
    assert_eq!(tree.node(child).proven, Proven::Unsolved);

    tree.set_proven(grandchildren.start + 1, Proven::Win);
    tree.refresh_proven(grandchildren.start + 1);
    assert_eq!(tree.node(child).proven, Proven::Loss);
    // one child lost for the opponent wins the root outright
    assert_eq!(tree.root().proven, Proven::Win);
}

#[test]
fn test_uct() {
    let (mut tree, _) = expanded_root();
    let child = tree.root().children().start;
    assert_eq!(tree.node(child).uct(0, 1.0), f64::INFINITY);
    tree.backpropagate(child, 1);
    tree.backpropagate(child, 0);
    let node = tree.node(child);
    assert_eq!(node.mean_reward(), 0.5);
    let expected = 0.5 + 2.0 * ((2.0f64).ln() / 2.0).sqrt();
    assert!((node.uct(2, 2.0) - expected).abs() < 1e-12);
}
