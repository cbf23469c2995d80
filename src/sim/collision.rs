//! Ground and cliff collision for ballistic flight
//!
//! Each tick an actor proposes a straight displacement. If the end of that
//! displacement is below the ground, the step is clipped back to where the
//! path first meets the terrain:
//!
//! - approaching the ground from above clips against the ground surface
//!   (a safe landing);
//! - running into a cliff face from the left clips against the wall
//!   (the actor is destroyed), unless the ground is reached first.
//!
//! Ground always wins when both clips survive, even if the wall clip is the
//! shorter displacement.

use glam::Vec2;

use super::terrain::TerrainQuery;

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactKind {
    /// Came down on top of the ground
    Landed,
    /// Struck a cliff face (or was already embedded in the terrain)
    Destroyed,
}

/// Resolved collision for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub kind: ImpactKind,
    /// Where the actor comes to rest
    pub point: Vec2,
    /// Ground level at the tentative end of the step
    pub ground: f32,
    /// Cliff face considered this step, after the inside-the-wall clamp
    pub wall_x: f32,
}

/// Outcome of moving along one displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightStep {
    /// Path stays above ground; move to this point
    Clear(Vec2),
    /// Path breaches the ground
    Impact(Impact),
}

/// Move from `start` by `step`, clipping against `terrain`
pub fn advance<T: TerrainQuery + ?Sized>(start: Vec2, step: Vec2, terrain: &T) -> FlightStep {
    let end = start + step;
    let ground = terrain.ground_level(end.x);
    if end.y < ground {
        FlightStep::Impact(resolve_impact(start, step, ground, terrain))
    } else {
        FlightStep::Clear(end)
    }
}

/// Find where a step that ends below `ground` first meets the terrain
///
/// `ground` must be the ground level at `start + step`.
pub fn resolve_impact<T: TerrainQuery + ?Sized>(
    start: Vec2,
    step: Vec2,
    ground: f32,
    terrain: &T,
) -> Impact {
    let end = start + step;
    log::debug!(
        "collision: ({:.1}, {:.1}) + ({:+.1}, {:.1}) -> ({:.1}, {:.1})",
        start.x,
        start.y,
        step.x,
        step.y,
        end.x,
        end.y
    );
    log::debug!("ground level at {:.1}: {:.1}", end.x, ground);

    let mut wall_x = terrain.vertical_wall_left_of(end.x);
    log::debug!("wall at {:.1}", wall_x);
    if wall_x < start.x {
        // Float slack from an earlier step left us at or past the face
        log::debug!("inside the wall!");
        wall_x = start.x;
    }

    let mut ground_hit = ground_clip(start, step, ground);
    if let Some(p) = ground_hit {
        log::debug!("clip against ground: ({:.1}, {:.1})", p.x, p.y);
    }

    let mut wall_hit = None;
    if step.x > 0.0 && start.x <= wall_x {
        let p = wall_clip(start, step, wall_x);
        log::debug!("clip against wall: ({:.1}, {:.1})", p.x, p.y);
        if p.y > ground {
            log::debug!("wall clip above ground");
        } else {
            wall_hit = Some(p);
        }
        if ground_hit.is_some_and(|g| g.x < wall_x) {
            log::debug!("ground clip left of cliff");
            ground_hit = None;
        }
    }

    let (kind, point) = match (ground_hit, wall_hit) {
        (Some(p), _) => (ImpactKind::Landed, p),
        (None, Some(p)) => {
            log::debug!("wall wins");
            (ImpactKind::Destroyed, p)
        }
        (None, None) => {
            // Started below the surface with no face to clip against
            log::debug!("embedded at start");
            wall_x = start.x;
            (ImpactKind::Destroyed, start)
        }
    };

    Impact {
        kind,
        point,
        ground,
        wall_x,
    }
}

/// Where the step crosses `ground` coming from above
///
/// `None` when the step starts below the surface or never moves down.
pub fn ground_clip(start: Vec2, step: Vec2, ground: f32) -> Option<Vec2> {
    if start.y < ground || step.y >= 0.0 {
        return None;
    }
    let x = start.x + (ground - start.y) * step.x / step.y;
    Some(Vec2::new(x, ground))
}

/// Where the step crosses the vertical line `x = wall_x`
///
/// Only meaningful for `step.x > 0.0` and `start.x <= wall_x`.
#[inline]
pub fn wall_clip(start: Vec2, step: Vec2, wall_x: f32) -> Vec2 {
    let y = start.y + (wall_x - start.x) * step.y / step.x;
    Vec2::new(wall_x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same ground everywhere, one configurable cliff face
    struct FakeTerrain {
        ground: f32,
        wall_x: f32,
    }

    impl TerrainQuery for FakeTerrain {
        fn ground_level(&self, _x: f32) -> f32 {
            self.ground
        }

        fn vertical_wall_left_of(&self, _x: f32) -> f32 {
            self.wall_x
        }
    }

    fn impact(start: (f32, f32), step: (f32, f32), terrain: &FakeTerrain) -> Impact {
        match advance(Vec2::from(start), Vec2::from(step), terrain) {
            FlightStep::Impact(impact) => impact,
            FlightStep::Clear(p) => panic!("expected an impact, moved clear to {p}"),
        }
    }

    #[test]
    fn test_clear_step_moves_to_end() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let step = advance(Vec2::new(20.0, 200.0), Vec2::new(10.0, -50.0), &terrain);
        assert_eq!(step, FlightStep::Clear(Vec2::new(30.0, 150.0)));
    }

    #[test]
    fn test_ending_exactly_on_ground_is_clear() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let step = advance(Vec2::new(20.0, 150.0), Vec2::new(10.0, -50.0), &terrain);
        assert_eq!(step, FlightStep::Clear(Vec2::new(30.0, 100.0)));
    }

    #[test]
    fn test_ground_from_above() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let hit = impact((20.0, 120.0), (10.0, -50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Landed);
        assert_eq!(hit.point, Vec2::new(24.0, 100.0));
    }

    #[test]
    fn test_ground_beyond_wall_wins() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 22.0,
        };
        let hit = impact((20.0, 120.0), (10.0, -50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Landed);
        assert_eq!(hit.point, Vec2::new(24.0, 100.0));
        assert_eq!(hit.wall_x, 22.0);
    }

    #[test]
    fn test_ground_clip_left_of_cliff_loses_to_wall() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 40.0,
        };
        let hit = impact((20.0, 120.0), (40.0, -50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(40.0, 95.0));
    }

    #[test]
    fn test_rising_into_cliff() {
        let terrain = FakeTerrain {
            ground: 200.0,
            wall_x: 40.0,
        };
        let hit = impact((20.0, 30.0), (40.0, 50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(40.0, 55.0));
    }

    #[test]
    fn test_starting_on_the_wall() {
        let terrain = FakeTerrain {
            ground: 710.0,
            wall_x: 720.0,
        };
        let hit = impact((720.0, 495.0), (50.0, 50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(720.0, 495.0));
        assert_eq!(hit.wall_x, 720.0);
    }

    #[test]
    fn test_starting_inside_the_wall_clamps_to_start() {
        let terrain = FakeTerrain {
            ground: 710.0,
            wall_x: 720.0,
        };
        let hit = impact((721.0, 495.0), (50.0, 50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(721.0, 495.0));
        assert_eq!(hit.wall_x, 721.0);
    }

    #[test]
    fn test_pure_vertical_drop_lands() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let hit = impact((50.0, 110.0), (0.0, -30.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Landed);
        assert_eq!(hit.point, Vec2::new(50.0, 100.0));
    }

    #[test]
    fn test_pure_vertical_while_embedded_is_destroyed_in_place() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let hit = impact((50.0, 90.0), (0.0, -5.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(50.0, 90.0));
        assert_eq!(hit.wall_x, 50.0);
        assert!(hit.point.is_finite());
    }

    #[test]
    fn test_pure_horizontal_into_rising_floor() {
        // No ground clip without vertical motion; the wall catches it
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 40.0,
        };
        let hit = impact((20.0, 80.0), (40.0, 0.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Destroyed);
        assert_eq!(hit.point, Vec2::new(40.0, 80.0));
    }

    #[test]
    fn test_leftward_landing_ignores_left_wall() {
        let terrain = FakeTerrain {
            ground: 100.0,
            wall_x: 0.0,
        };
        let hit = impact((50.0, 120.0), (-10.0, -50.0), &terrain);
        assert_eq!(hit.kind, ImpactKind::Landed);
        assert_eq!(hit.point, Vec2::new(46.0, 100.0));
    }

    #[test]
    fn test_ground_clip_requires_approach_from_above() {
        assert_eq!(
            ground_clip(Vec2::new(0.0, 90.0), Vec2::new(10.0, -10.0), 100.0),
            None
        );
        assert_eq!(
            ground_clip(Vec2::new(0.0, 120.0), Vec2::new(10.0, 0.0), 100.0),
            None
        );
        assert_eq!(
            ground_clip(Vec2::new(0.0, 100.0), Vec2::new(10.0, -10.0), 100.0),
            Some(Vec2::new(0.0, 100.0))
        );
    }

    #[test]
    fn test_wall_clip_interpolates() {
        let p = wall_clip(Vec2::new(0.0, 0.0), Vec2::new(40.0, 20.0), 10.0);
        assert_eq!(p, Vec2::new(10.0, 5.0));
    }
}
