//! Factorization cache
//!
//! Maps the identity of a [`SystemMatrix`] to its most recent LU
//! factorization, so the same system can be solved against many right-hand
//! sides without refactoring. Records live in a slot registry that grows on
//! demand; freed slots are reused and trailing empty slots are dropped.
//!
//! Lookups compare identities only. After editing a matrix that is already
//! cached, call [`FactorizationCache::invalidate_and_refactor`];
//! [`FactorizationCache::solve`] refuses to use a factorization built from an
//! older revision of the matrix.

use crate::config::LuConfig;
use crate::direct::lu::{LuFactorization, lu_factorize};
use crate::error::{Result, SolverError};
use crate::system::{SystemId, SystemMatrix};
use math_numerics_dense::RealScalar;
use ndarray::Array1;
use std::collections::HashMap;

/// Handle to a cached factorization.
///
/// Returned by [`FactorizationCache::factor`] and
/// [`FactorizationCache::get_or_create`]; a handle stops resolving once its
/// record is released, even if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactorHandle {
    slot: usize,
    generation: u64,
}

impl FactorHandle {
    pub fn slot(&self) -> usize {
        self.slot
    }
}

#[derive(Debug)]
struct CacheEntry<T: RealScalar> {
    system: SystemId,
    /// Matrix revision the record was built from
    revision: u64,
    generation: u64,
    record: LuFactorization<T>,
}

/// Identity-keyed registry of LU factorizations.
#[derive(Debug)]
pub struct FactorizationCache<T: RealScalar> {
    config: LuConfig,
    slots: Vec<Option<CacheEntry<T>>>,
    index: HashMap<SystemId, usize>,
    free: Vec<usize>,
    next_generation: u64,
    factorizations: usize,
}

impl<T: RealScalar> Default for FactorizationCache<T> {
    fn default() -> Self {
        Self {
            config: LuConfig::default(),
            slots: Vec::new(),
            index: HashMap::new(),
            free: Vec::new(),
            next_generation: 0,
            factorizations: 0,
        }
    }
}

impl<T: RealScalar> FactorizationCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache whose factorizations use `config`.
    pub fn with_config(config: LuConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &LuConfig {
        &self.config
    }

    /// Number of live factorizations
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of times the factorization engine has run
    pub fn factorization_count(&self) -> usize {
        self.factorizations
    }

    pub fn contains(&self, a: &SystemMatrix<T>) -> bool {
        self.index.contains_key(&a.id())
    }

    /// Handle of the cached factorization of `a`, if any
    pub fn handle_of(&self, a: &SystemMatrix<T>) -> Option<FactorHandle> {
        let slot = *self.index.get(&a.id())?;
        self.slots[slot].as_ref().map(|entry| FactorHandle {
            slot,
            generation: entry.generation,
        })
    }

    /// The factorization a handle refers to
    pub fn record(&self, handle: FactorHandle) -> Result<&LuFactorization<T>> {
        self.entry(handle).map(|entry| &entry.record)
    }

    /// Return the cached factorization of `a`, factoring it on a miss.
    ///
    /// A hit is returned as is, without checking that `a` still holds the
    /// values it was factored from.
    pub fn get_or_create(&mut self, a: &SystemMatrix<T>) -> Result<FactorHandle> {
        if let Some(handle) = self.handle_of(a) {
            return Ok(handle);
        }
        self.insert_new(a)
    }

    /// Factor `a`, refreshing its cached record in place if one exists.
    ///
    /// If refactoring an existing record fails, that record is released: it
    /// no longer describes `a`. A failed first factorization leaves the cache
    /// unchanged.
    pub fn invalidate_and_refactor(&mut self, a: &SystemMatrix<T>) -> Result<FactorHandle> {
        let Some(&slot) = self.index.get(&a.id()) else {
            return self.insert_new(a);
        };

        check_square(a)?;
        let Some(mut entry) = self.slots[slot].take() else {
            // index and slots disagree; treat as a miss
            self.index.remove(&a.id());
            return self.insert_new(a);
        };

        self.factorizations += 1;
        match entry.record.refactor(a.values(), &self.config) {
            Ok(()) => {
                entry.revision = a.revision();
                let handle = FactorHandle {
                    slot,
                    generation: entry.generation,
                };
                self.slots[slot] = Some(entry);
                log::debug!("refreshed factorization in slot {slot}");
                Ok(handle)
            }
            Err(err) => {
                self.index.remove(&a.id());
                self.free_slot(slot);
                log::debug!("released factorization in slot {slot} after failed refactor");
                Err(err)
            }
        }
    }

    /// Explicitly factor `a`; an existing record is refactored in place.
    pub fn factor(&mut self, a: &SystemMatrix<T>) -> Result<FactorHandle> {
        self.invalidate_and_refactor(a)
    }

    /// General entry point: solve `Ax = b` into `x`.
    ///
    /// Dimensions are checked before the cache is consulted. `a` is factored
    /// on first use; later solves reuse the cached factorization.
    pub fn solve(&mut self, a: &SystemMatrix<T>, x: &mut Array1<T>, b: &Array1<T>) -> Result<()> {
        check_square(a)?;
        let n = a.nrows();
        for len in [x.len(), b.len()] {
            if len != n {
                return Err(SolverError::DimensionMismatch {
                    expected: n,
                    got: len,
                });
            }
        }

        let handle = self.get_or_create(a)?;
        let entry = self.entry(handle)?;
        if entry.revision != a.revision() {
            return Err(SolverError::StaleFactorization {
                factored: entry.revision,
                current: a.revision(),
            });
        }
        entry.record.solve(x, b)
    }

    /// Solve with a previously obtained handle, bypassing the lookup.
    pub fn solve_with(&self, handle: FactorHandle, x: &mut Array1<T>, b: &Array1<T>) -> Result<()> {
        self.record(handle)?.solve(x, b)
    }

    /// Drop the factorization of `a`; returns whether one existed.
    pub fn release(&mut self, a: &SystemMatrix<T>) -> bool {
        match self.index.remove(&a.id()) {
            Some(slot) => {
                self.free_slot(slot);
                log::debug!("released factorization in slot {slot}");
                true
            }
            None => false,
        }
    }

    /// Drop the factorization a handle refers to; returns whether it was live.
    pub fn release_handle(&mut self, handle: FactorHandle) -> bool {
        let Ok(system) = self.entry(handle).map(|entry| entry.system) else {
            return false;
        };
        self.index.remove(&system);
        self.free_slot(handle.slot);
        true
    }

    /// Drop every factorization.
    pub fn release_all(&mut self) {
        log::debug!("releasing {} factorizations", self.len());
        self.slots.clear();
        self.index.clear();
        self.free.clear();
    }

    fn entry(&self, handle: FactorHandle) -> Result<&CacheEntry<T>> {
        self.slots
            .get(handle.slot)
            .and_then(Option::as_ref)
            .filter(|entry| entry.generation == handle.generation)
            .ok_or(SolverError::UnknownFactorization {
                slot: handle.slot,
                generation: handle.generation,
            })
    }

    fn insert_new(&mut self, a: &SystemMatrix<T>) -> Result<FactorHandle> {
        check_square(a)?;
        self.factorizations += 1;
        let record = lu_factorize(a.values(), &self.config)?;

        let generation = self.next_generation;
        self.next_generation += 1;
        let entry = CacheEntry {
            system: a.id(),
            revision: a.revision(),
            generation,
            record,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.index.insert(a.id(), slot);
        log::debug!(
            "cached {n}x{n} factorization in slot {slot}",
            n = a.nrows()
        );
        Ok(FactorHandle { slot, generation })
    }

    fn free_slot(&mut self, slot: usize) {
        self.slots[slot] = None;
        self.free.push(slot);

        // compact trailing empty slots
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.free.retain(|&s| s < len);
    }
}

fn check_square<T: RealScalar>(a: &SystemMatrix<T>) -> Result<()> {
    if !a.is_square() {
        return Err(SolverError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn system(values: ndarray::Array2<f64>) -> SystemMatrix<f64> {
        SystemMatrix::new(values).unwrap()
    }

    #[test]
    fn test_get_or_create_reuses_record() {
        let a = system(array![[4.0, 3.0], [6.0, 3.0]]);
        let mut cache = FactorizationCache::new();

        let h1 = cache.get_or_create(&a).unwrap();
        let h2 = cache.get_or_create(&a).unwrap();

        assert_eq!(h1, h2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.factorization_count(), 1);
    }

    #[test]
    fn test_factor_refactors_in_place() {
        let a = system(array![[4.0, 3.0], [6.0, 3.0]]);
        let mut cache = FactorizationCache::new();

        let h1 = cache.factor(&a).unwrap();
        let ptr = cache.record(h1).unwrap().lu().as_ptr();
        let h2 = cache.factor(&a).unwrap();

        assert_eq!(h1, h2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.factorization_count(), 2);
        assert_eq!(cache.record(h2).unwrap().lu().as_ptr(), ptr);
    }

    #[test]
    fn test_release_invalidates_handle() {
        let a = system(array![[2.0, 0.0], [0.0, 2.0]]);
        let b = system(array![[3.0, 0.0], [0.0, 3.0]]);
        let mut cache = FactorizationCache::new();

        let ha = cache.get_or_create(&a).unwrap();
        assert!(cache.release(&a));
        assert!(!cache.release(&a));
        assert!(!cache.contains(&a));

        // the freed slot is reused, the old handle must not resolve to it
        let hb = cache.get_or_create(&b).unwrap();
        assert_eq!(hb.slot(), ha.slot());
        let mut x = Array1::zeros(2);
        let err = cache.solve_with(ha, &mut x, &array![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SolverError::UnknownFactorization { .. }));

        cache.solve_with(hb, &mut x, &array![3.0, 6.0]).unwrap();
        assert_relative_eq!(x[0], 1.0);
        assert_relative_eq!(x[1], 2.0);
    }

    #[test]
    fn test_release_handle_and_compaction() {
        let systems: Vec<_> = (1..=3)
            .map(|k| system(array![[k as f64, 0.0], [0.0, 1.0]]))
            .collect();
        let mut cache = FactorizationCache::new();
        let handles: Vec<_> = systems
            .iter()
            .map(|s| cache.get_or_create(s).unwrap())
            .collect();
        assert_eq!(cache.len(), 3);

        assert!(cache.release_handle(handles[2]));
        assert!(!cache.release_handle(handles[2]));
        assert!(cache.release(&systems[1]));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.slots.len(), 1);
        assert!(cache.free.is_empty());

        cache.release_all();
        assert!(cache.is_empty());
        assert!(cache.record(handles[0]).is_err());
    }

    #[test]
    fn test_stale_solve_refused() {
        let mut a = system(array![[4.0, 3.0], [6.0, 3.0]]);
        let mut cache = FactorizationCache::new();
        let mut x = Array1::zeros(2);
        let b = array![7.0, 9.0];

        cache.solve(&a, &mut x, &b).unwrap();
        a.set(0, 0, 5.0).unwrap();

        let err = cache.solve(&a, &mut x, &b).unwrap_err();
        assert!(err.is_stale());

        cache.invalidate_and_refactor(&a).unwrap();
        cache.solve(&a, &mut x, &b).unwrap();
        let ax = a.values().dot(&x);
        assert_relative_eq!(ax[0], 7.0, epsilon = 1e-12);
        assert_relative_eq!(ax[1], 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_failed_refactor_evicts() {
        let mut a = system(array![[1.0, 2.0], [3.0, 4.0]]);
        let mut cache = FactorizationCache::new();
        cache.factor(&a).unwrap();

        a.values_mut().row_mut(1).fill(0.0);
        let err = cache.invalidate_and_refactor(&a).unwrap_err();
        assert!(err.is_singular());
        assert!(!cache.contains(&a));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_refactor_after_resize() {
        let mut a = system(array![[2.0, 0.0], [0.0, 2.0]]);
        let mut cache = FactorizationCache::new();
        cache.factor(&a).unwrap();

        *a.values_mut() = array![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 4.0]];
        let h = cache.invalidate_and_refactor(&a).unwrap();
        assert_eq!(cache.record(h).unwrap().dim(), 3);

        let mut x = Array1::zeros(3);
        cache.solve(&a, &mut x, &array![1.0, 2.0, 4.0]).unwrap();
        for i in 0..3 {
            assert_relative_eq!(x[i], 1.0);
        }
    }

    #[test]
    fn test_with_config_validates() {
        let bad = LuConfig {
            alpha: f64::NAN,
            ..LuConfig::default()
        };
        assert!(FactorizationCache::<f64>::with_config(bad).is_err());
    }
}
