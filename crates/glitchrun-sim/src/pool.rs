//! Free-list pool for short-lived values.

use glitchrun_core::components::{Projectile, ProjectileMotion};

/// Values that can be scrubbed for reuse.
pub trait Poolable: Default {
    /// Clear per-use state, keeping allocated buffers.
    fn reset(&mut self);
}

impl Poolable for Projectile {
    fn reset(&mut self) {
        self.hit_list.clear();
        self.motion = ProjectileMotion::Straight;
        self.damage = 0.0;
        self.duration = Some(0);
        self.pierce = 1;
        self.knockback = 0.0;
        self.age = 0;
    }
}

/// Explicit acquire/release free list. Acquire never fails: an empty pool
/// hands out a fresh default value.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    max_free: usize,
    allocated: u64,
    reused: u64,
}

impl<T: Poolable> Pool<T> {
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_free),
            max_free,
            allocated: 0,
            reused: 0,
        }
    }

    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(item) => {
                self.reused += 1;
                item
            }
            None => {
                self.allocated += 1;
                T::default()
            }
        }
    }

    /// Return a value. Dropped instead if the free list is full.
    pub fn release(&mut self, mut item: T) {
        if self.free.len() < self.max_free {
            item.reset();
            self.free.push(item);
        }
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// (fresh allocations, reuses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.allocated, self.reused)
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new(512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_projectiles_are_reused_clean() {
        let mut world = hecs::World::new();
        let enemy = world.spawn(());

        let mut pool: Pool<Projectile> = Pool::new(4);
        let mut p = pool.acquire();
        p.damage = 12.0;
        p.register_hit(enemy);
        let capacity = p.hit_list.capacity();
        pool.release(p);
        assert_eq!(pool.available(), 1);

        let q = pool.acquire();
        assert!(q.hit_list.is_empty());
        assert!(q.hit_list.capacity() >= capacity);
        assert_eq!(q.damage, 0.0);
        assert_eq!(pool.stats(), (1, 1));
    }

    #[test]
    fn full_pool_drops_extra_values() {
        let mut pool: Pool<Projectile> = Pool::new(1);
        pool.release(Projectile::default());
        pool.release(Projectile::default());
        assert_eq!(pool.available(), 1);
    }
}
