use pixel_arcade::entities::*;
use pixel_arcade::pool::Pool;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bullet(x: i32) -> Actor {
    Actor::new(ActorKind::PlayerBullet, Point::new(x, 100), Vec2::new(0, -3))
}

#[test]
fn new_pool_is_empty() {
    let pool: Pool<3> = Pool::new(ActorKind::PlayerBullet);
    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.active_count(), 0);
    assert!(!pool.any_active());
    assert!(pool.slots().iter().all(|s| s.kind == ActorKind::PlayerBullet));
}

#[test]
fn spawn_fills_lowest_free_slot() {
    let mut pool: Pool<3> = Pool::new(ActorKind::PlayerBullet);
    assert_eq!(pool.spawn(bullet(1)), Some(0));
    assert_eq!(pool.spawn(bullet(2)), Some(1));
    assert_eq!(pool.spawn(bullet(3)), Some(2));
    assert!(pool.is_full());

    pool.deactivate(1);
    assert_eq!(pool.spawn(bullet(4)), Some(1));
    assert_eq!(pool.get(1).map(|a| a.pos.x), Some(4));
}

#[test]
fn spawn_on_full_pool_is_dropped() {
    let mut pool: Pool<2> = Pool::new(ActorKind::PlayerBullet);
    pool.spawn(bullet(1));
    pool.spawn(bullet(2));
    let before = pool.slots().to_vec();

    assert_eq!(pool.spawn(bullet(3)), None);
    assert_eq!(pool.slots(), &before[..]);
}

#[test]
fn spawn_activates_dormant_template() {
    let mut pool: Pool<1> = Pool::new(ActorKind::Alien);
    let idx = pool.spawn(Actor::dormant(ActorKind::Alien));
    assert_eq!(idx, Some(0));
    assert!(pool.slots()[0].active);
}

#[test]
fn active_count_never_exceeds_capacity() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut pool: Pool<5> = Pool::new(ActorKind::AlienBullet);
    for i in 0..500 {
        if rng.gen_bool(0.6) {
            let was_full = pool.is_full();
            let got = pool.spawn(bullet(i));
            assert_eq!(got.is_none(), was_full);
        } else {
            pool.deactivate(rng.gen_range(0..5));
        }
        assert!(pool.active_count() <= pool.capacity());
    }
}

#[test]
fn iter_active_reports_slot_indices() {
    let mut pool: Pool<4> = Pool::new(ActorKind::Alien);
    for x in 0..4 {
        pool.place(x as usize, Actor::new(ActorKind::Alien, Point::new(x, 0), Vec2::ZERO));
    }
    pool.deactivate(0);
    pool.deactivate(2);
    let live: Vec<usize> = pool.iter_active().map(|(i, _)| i).collect();
    assert_eq!(live, vec![1, 3]);
}

#[test]
fn clear_and_out_of_range_are_safe() {
    let mut pool: Pool<2> = Pool::new(ActorKind::Brick);
    pool.spawn(Actor::new(ActorKind::Brick, Point::new(0, 0), Vec2::ZERO));
    pool.deactivate(99);
    pool.place(99, bullet(0));
    assert_eq!(pool.active_count(), 1);
    pool.clear();
    assert!(!pool.any_active());
    assert!(pool.get(99).is_none());
}
