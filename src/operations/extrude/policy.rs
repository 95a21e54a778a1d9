//! Marker propagation rules for extrusion.
//!
//! Every lifted entity resolves its marker through [`RULES`], keyed by what
//! was lifted and where it sits along the new axis. A rule decides whether the
//! entity is emitted (or tagged) at all and which marker it receives.

/// Entity produced by lifting a base entity one dimension up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lift {
    /// Copy of a base node on one replica.
    ReplicaNode,
    /// Marked base edge swept into a quadrangle (2D path).
    SweptEdge,
    /// Base cell swept into the next-dimension cell.
    SweptCell,
    /// Trajectory of a marked base node, a side edge (2D path).
    NodeTrajectory,
    /// Trajectory of the base node with minimal x (2D path).
    LeftTrajectory,
    /// Trajectory of the base node with maximal x (2D path).
    RightTrajectory,
    /// Marked base edge swept into a side face (3D path).
    SweptSide,
    /// Copy of a lifted facet on the first or last replica.
    EndCap,
}

/// Position of a replica, or a layer step, along the new axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Interior,
    Last,
}

impl Position {
    /// Position of replica `k` out of `count`.
    #[must_use]
    pub fn of(k: usize, count: usize) -> Self {
        if k == 0 {
            Self::First
        } else if k + 1 == count {
            Self::Last
        } else {
            Self::Interior
        }
    }
}

/// Caller-supplied markers that can replace propagated ones.
///
/// `start` and `end` address the first and last replica (front/back in 2D,
/// bottom/top in 3D). Zero means "no override".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub start: i32,
    pub end: i32,
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Start,
    End,
    Left,
    Right,
}

impl Overrides {
    fn get(&self, slot: Slot) -> i32 {
        match slot {
            Slot::Start => self.start,
            Slot::End => self.end,
            Slot::Left => self.left,
            Slot::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum At {
    Any,
    Only(Position),
}

#[derive(Debug, Clone, Copy)]
enum Emit {
    Always,
    IfMarked,
    IfOverride(Slot),
}

#[derive(Debug, Clone, Copy)]
enum Value {
    Source,
    Override(Slot),
    OverrideOr(Slot),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    lift: Lift,
    at: At,
    emit: Emit,
    value: Value,
}

const fn rule(lift: Lift, at: At, emit: Emit, value: Value) -> Rule {
    Rule {
        lift,
        at,
        emit,
        value,
    }
}

const RULES: &[Rule] = &[
    rule(Lift::ReplicaNode, At::Only(Position::First), Emit::Always, Value::OverrideOr(Slot::Start)),
    rule(Lift::ReplicaNode, At::Only(Position::Interior), Emit::Always, Value::Source),
    rule(Lift::ReplicaNode, At::Only(Position::Last), Emit::Always, Value::OverrideOr(Slot::End)),
    rule(Lift::SweptEdge, At::Any, Emit::IfMarked, Value::Source),
    rule(Lift::SweptCell, At::Any, Emit::Always, Value::Source),
    rule(Lift::NodeTrajectory, At::Any, Emit::IfMarked, Value::Source),
    rule(Lift::LeftTrajectory, At::Any, Emit::IfOverride(Slot::Left), Value::Override(Slot::Left)),
    rule(Lift::RightTrajectory, At::Any, Emit::IfOverride(Slot::Right), Value::Override(Slot::Right)),
    rule(Lift::SweptSide, At::Any, Emit::IfMarked, Value::Source),
    rule(Lift::EndCap, At::Only(Position::First), Emit::IfOverride(Slot::Start), Value::Override(Slot::Start)),
    rule(Lift::EndCap, At::Only(Position::Last), Emit::IfOverride(Slot::End), Value::Override(Slot::End)),
];

/// Resolves the marker of a lifted entity.
///
/// Returns `None` when the entity is not emitted (or not tagged) at this
/// position, e.g. an unmarked edge in the 2D path or an interior end cap.
#[must_use]
pub fn resolve(lift: Lift, position: Position, source: i32, overrides: &Overrides) -> Option<i32> {
    let rule = RULES.iter().find(|r| {
        r.lift == lift
            && match r.at {
                At::Any => true,
                At::Only(p) => p == position,
            }
    })?;

    let emitted = match rule.emit {
        Emit::Always => true,
        Emit::IfMarked => source != 0,
        Emit::IfOverride(slot) => overrides.get(slot) != 0,
    };
    if !emitted {
        return None;
    }

    Some(match rule.value {
        Value::Source => source,
        Value::Override(slot) => overrides.get(slot),
        Value::OverrideOr(slot) => match overrides.get(slot) {
            0 => source,
            o => o,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Overrides = Overrides {
        start: 0,
        end: 0,
        left: 0,
        right: 0,
    };

    const ALL: Overrides = Overrides {
        start: 10,
        end: 20,
        left: 30,
        right: 40,
    };

    #[test]
    fn positions_along_axis() {
        assert_eq!(Position::of(0, 4), Position::First);
        assert_eq!(Position::of(2, 4), Position::Interior);
        assert_eq!(Position::of(3, 4), Position::Last);
        assert_eq!(Position::of(1, 2), Position::Last);
    }

    // ── replica nodes ──

    #[test]
    fn replica_nodes_keep_marker_without_override() {
        for pos in [Position::First, Position::Interior, Position::Last] {
            assert_eq!(resolve(Lift::ReplicaNode, pos, 7, &NONE), Some(7));
            assert_eq!(resolve(Lift::ReplicaNode, pos, 0, &NONE), Some(0));
        }
    }

    #[test]
    fn end_replica_nodes_take_override() {
        assert_eq!(resolve(Lift::ReplicaNode, Position::First, 7, &ALL), Some(10));
        assert_eq!(resolve(Lift::ReplicaNode, Position::Interior, 7, &ALL), Some(7));
        assert_eq!(resolve(Lift::ReplicaNode, Position::Last, 7, &ALL), Some(20));
    }

    // ── swept entities ──

    #[test]
    fn only_marked_edges_are_swept() {
        assert_eq!(resolve(Lift::SweptEdge, Position::First, 0, &ALL), None);
        assert_eq!(resolve(Lift::SweptEdge, Position::Interior, 3, &ALL), Some(3));
    }

    #[test]
    fn cells_are_always_swept() {
        assert_eq!(resolve(Lift::SweptCell, Position::Last, 0, &ALL), Some(0));
        assert_eq!(resolve(Lift::SweptCell, Position::First, 5, &ALL), Some(5));
    }

    #[test]
    fn side_markers_follow_source() {
        assert_eq!(resolve(Lift::NodeTrajectory, Position::First, 0, &ALL), None);
        assert_eq!(resolve(Lift::NodeTrajectory, Position::Last, 4, &ALL), Some(4));
        assert_eq!(resolve(Lift::SweptSide, Position::Interior, 0, &ALL), None);
        assert_eq!(resolve(Lift::SweptSide, Position::Interior, -2, &ALL), Some(-2));
    }

    #[test]
    fn extremes_need_override() {
        assert_eq!(resolve(Lift::LeftTrajectory, Position::First, 4, &NONE), None);
        assert_eq!(resolve(Lift::LeftTrajectory, Position::First, 4, &ALL), Some(30));
        assert_eq!(resolve(Lift::RightTrajectory, Position::Last, 4, &ALL), Some(40));
    }

    // ── end caps ──

    #[test]
    fn end_caps_only_on_terminal_replicas() {
        assert_eq!(resolve(Lift::EndCap, Position::First, 0, &ALL), Some(10));
        assert_eq!(resolve(Lift::EndCap, Position::Last, 0, &ALL), Some(20));
        assert_eq!(resolve(Lift::EndCap, Position::Interior, 0, &ALL), None);
        assert_eq!(resolve(Lift::EndCap, Position::First, 0, &NONE), None);
    }
}
