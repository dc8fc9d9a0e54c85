//! Fixed timestep simulation tick
//!
//! One tick runs, in order: player update, object scroll plus collision
//! resolution, particle aging, then the level-complete check.

use super::collision::{intersects, vertical_push_out};
use super::particle;
use super::state::World;
use super::track::{ObjectKind, SolidPolicy};
use crate::consts::*;

/// What happened during a tick that the frame loop must act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Players killed this tick
    pub deaths: u32,
    /// Reference object scrolled past the advance threshold
    pub level_complete: bool,
}

/// Resolved effect of one player/object overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Kill,
    Boost,
    Block,
    None,
}

fn contact(kind: ObjectKind, policy: SolidPolicy) -> Contact {
    match (kind, policy) {
        (ObjectKind::Hazard, _) => Contact::Kill,
        (ObjectKind::Boost, _) => Contact::Boost,
        (ObjectKind::Solid, SolidPolicy::Lethal) => Contact::Kill,
        (ObjectKind::Solid, SolidPolicy::Block) => Contact::Block,
        (ObjectKind::Solid, SolidPolicy::Passthrough) => Contact::None,
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, jump: bool, dt: f32) -> TickOutcome {
    world.time_ticks += 1;

    for player in &mut world.players {
        player.update(jump, dt);
    }

    let speed = world.scroll_speed();
    for obj in world.objects.iter_mut().filter(|o| o.active) {
        obj.scroll(speed, dt);
    }

    let deaths = resolve_collisions(world);

    particle::age(&mut world.particles, dt);
    if world.shake > 0.0 {
        world.shake = (world.shake - dt).max(0.0);
    }

    TickOutcome {
        deaths,
        level_complete: world.level_complete(),
    }
}

/// Test every live player against every collidable object
fn resolve_collisions(world: &mut World) -> u32 {
    let mut deaths = 0;

    for slot in 0..world.players.len() {
        for idx in 0..world.objects.len() {
            let player = &world.players[slot];
            if !player.alive {
                break;
            }
            let obj = &world.objects[idx];
            if !obj.is_collidable() {
                continue;
            }
            let (hitbox, obj_rect) = (player.hitbox(), obj.rect());
            if !intersects(&hitbox, &obj_rect) {
                continue;
            }

            match contact(obj.kind, obj.policy(world.solid_policy)) {
                Contact::Kill => {
                    if world.kill_player(slot) {
                        deaths += 1;
                    }
                }
                Contact::Boost => {
                    world.players[slot].velocity = BOOST_VELOCITY;
                }
                Contact::Block => {
                    let player = &mut world.players[slot];
                    player.pos.y += vertical_push_out(&hitbox, &obj_rect);
                    player.velocity = 0.0;
                    player.clamp_to_bounds();
                }
                Contact::None => {}
            }
        }
    }

    deaths
}
