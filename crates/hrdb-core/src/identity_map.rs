//! Identity map: one live instance per persisted row
//!
//! Instances are handed out as [`Shared<T>`] (`Rc<RefCell<T>>`). Looking up
//! the same row twice yields the same `Rc`, so a mutation through one handle
//! is visible through every other. The map is single-threaded (no Arc/Mutex)
//! and is passed explicitly to every repository call; its lifetime is
//! whatever the caller gives it.
//!
//! While a unit of work is open the map journals every change it makes so
//! that a rolled-back transaction can also be rolled back in memory.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::{ExResult, HrError};
use crate::model::sealed::AssignId;
use crate::model::{Department, Employee, Entity, Review};

/// Shared handle to a live entity instance
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a fresh shared handle
pub fn share<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Borrow an instance for reading
///
/// # Errors
/// * `BorrowConflict` - If the instance is currently mutably borrowed
pub fn read<T: Entity>(instance: &Shared<T>) -> ExResult<Ref<'_, T>> {
    instance.try_borrow().map_err(|_| {
        HrError::BorrowConflict {
            entity: T::KIND,
            id: None,
        }
        .into()
    })
}

/// Borrow an instance for writing
///
/// # Errors
/// * `BorrowConflict` - If the instance is currently borrowed
pub fn write<T: Entity>(instance: &Shared<T>) -> ExResult<RefMut<'_, T>> {
    instance.try_borrow_mut().map_err(|_| {
        HrError::BorrowConflict {
            entity: T::KIND,
            id: None,
        }
        .into()
    })
}

/// A journaled change, replayed backwards on rollback
#[derive(Debug)]
enum Change<T> {
    /// Insert assigned `id` to `instance`
    Inserted {
        id: i64,
        instance: Shared<T>,
        displaced: Option<Shared<T>>,
    },
    /// Update (re)registered an instance under `id`
    Registered {
        id: i64,
        displaced: Option<Shared<T>>,
    },
    /// Delete cleared `instance`'s id and dropped the map entry
    Removed {
        id: i64,
        instance: Shared<T>,
        evicted: Option<Shared<T>>,
    },
    /// Hydration overwrote a cached instance
    Refreshed { instance: Shared<T>, before: T },
}

/// Identity cache for one entity type
#[derive(Debug)]
pub struct EntityCache<T> {
    entries: HashMap<i64, Shared<T>>,
    journal: Option<Vec<Change<T>>>,
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            journal: None,
        }
    }
}

impl<T: Entity> EntityCache<T> {
    /// Get the live instance for a row id, if cached
    pub fn get(&self, id: i64) -> Option<Shared<T>> {
        self.entries.get(&id).cloned()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached row ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Persist a transient instance and register it under the id `insert` returns
    ///
    /// The instance stays mutably borrowed from before `insert` runs until
    /// it carries its new id, so a conflicting borrow fails before anything
    /// is written.
    ///
    /// # Errors
    /// * `BorrowConflict` - If the instance is currently borrowed; `insert`
    ///   is not called
    /// * Whatever `insert` returns; the instance stays transient
    pub fn insert_with<F>(&mut self, instance: &Shared<T>, insert: F) -> ExResult<i64>
    where
        F: FnOnce(&T) -> ExResult<i64>,
    {
        let mut guard = write(instance)?;
        let id = insert(&guard)?;
        guard.assign_id(Some(id));
        drop(guard);

        let displaced = self.entries.insert(id, instance.clone());
        self.record(|| Change::Inserted {
            id,
            instance: instance.clone(),
            displaced,
        });
        Ok(id)
    }

    /// Write a persisted instance with `update` and (re)register it under its id
    ///
    /// Replaces whatever instance was cached for that id.
    ///
    /// # Errors
    /// * `BorrowConflict` - If the instance is currently mutably borrowed
    /// * `MissingId` - If the instance is transient; `update` is not called
    /// * Whatever `update` returns; the map is left unchanged
    pub fn update_with<F>(&mut self, instance: &Shared<T>, update: F) -> ExResult<i64>
    where
        F: FnOnce(i64, &T) -> ExResult<()>,
    {
        let id = {
            let guard = read(instance)?;
            let id = guard.id().ok_or(HrError::MissingId {
                entity: T::KIND,
                op: "update",
            })?;
            update(id, &guard)?;
            id
        };

        let displaced = self.entries.insert(id, instance.clone());
        self.record(|| Change::Registered { id, displaced });
        Ok(id)
    }

    /// Delete a persisted instance with `delete`, evict it and clear its id
    ///
    /// Returns `None` without calling `delete` when the instance is transient.
    ///
    /// # Errors
    /// * `BorrowConflict` - If the instance is currently borrowed; `delete`
    ///   is not called
    /// * Whatever `delete` returns; the instance keeps its id and entry
    pub fn delete_with<F>(&mut self, instance: &Shared<T>, delete: F) -> ExResult<Option<i64>>
    where
        F: FnOnce(i64) -> ExResult<()>,
    {
        let mut guard = write(instance)?;
        let Some(id) = guard.id() else {
            return Ok(None);
        };
        delete(id)?;
        guard.assign_id(None);
        drop(guard);

        let evicted = self.entries.remove(&id);
        self.record(|| Change::Removed {
            id,
            instance: instance.clone(),
            evicted,
        });
        Ok(Some(id))
    }

    /// Map a raw row onto its live instance
    ///
    /// A cached instance is overwritten in place and returned; otherwise a
    /// new instance is built, registered and returned.
    ///
    /// # Errors
    /// * Validation errors when the row breaks a field rule; a cached
    ///   instance is left unchanged in that case
    /// * `BorrowConflict` - If the cached instance is currently borrowed
    pub fn hydrate(&mut self, row: T::Row) -> ExResult<Shared<T>> {
        let id = T::row_id(&row);

        if let Some(existing) = self.entries.get(&id).cloned() {
            let before = {
                let mut instance = write(&existing)?;
                let before = self.journal.as_ref().map(|_| (*instance).clone());
                instance.refresh_from_row(row)?;
                before
            };
            if let (Some(journal), Some(before)) = (self.journal.as_mut(), before) {
                journal.push(Change::Refreshed {
                    instance: existing.clone(),
                    before,
                });
            }
            tracing::debug!(table = T::KIND, entity_id = id, "identity map refreshed");
            return Ok(existing);
        }

        let instance = share(T::from_row(row)?);
        self.entries.insert(id, instance.clone());
        tracing::debug!(table = T::KIND, entity_id = id, "identity map registered");
        Ok(instance)
    }

    fn record(&mut self, change: impl FnOnce() -> Change<T>) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(change());
        }
    }

    fn begin(&mut self) {
        self.journal = Some(Vec::new());
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };

        for change in journal.into_iter().rev() {
            match change {
                Change::Inserted {
                    id,
                    instance,
                    displaced,
                } => {
                    set_id(&instance, None);
                    self.restore(id, displaced);
                }
                Change::Registered { id, displaced } => self.restore(id, displaced),
                Change::Removed {
                    id,
                    instance,
                    evicted,
                } => {
                    set_id(&instance, Some(id));
                    if let Some(evicted) = evicted {
                        self.entries.insert(id, evicted);
                    }
                }
                Change::Refreshed { instance, before } => match instance.try_borrow_mut() {
                    Ok(mut current) => *current = before,
                    Err(_) => tracing::warn!(
                        table = T::KIND,
                        "instance borrowed during rollback; refreshed fields kept"
                    ),
                },
            }
        }
    }

    fn restore(&mut self, id: i64, displaced: Option<Shared<T>>) {
        match displaced {
            Some(previous) => {
                self.entries.insert(id, previous);
            }
            None => {
                self.entries.remove(&id);
            }
        }
    }
}

fn set_id<T: Entity>(instance: &Shared<T>, id: Option<i64>) {
    match instance.try_borrow_mut() {
        Ok(mut current) => current.assign_id(id),
        Err(_) => tracing::warn!(
            table = T::KIND,
            "instance borrowed during rollback; id not restored"
        ),
    }
}

/// Entities with a slot in [`IdentityMap`]
pub trait Cached: Entity {
    fn cache(map: &IdentityMap) -> &EntityCache<Self>;
    fn cache_mut(map: &mut IdentityMap) -> &mut EntityCache<Self>;
}

/// Identity caches for every entity type
///
/// Not thread-safe; designed for single-threaded use.
#[derive(Debug, Default)]
pub struct IdentityMap {
    departments: EntityCache<Department>,
    employees: EntityCache<Employee>,
    reviews: EntityCache<Review>,
    in_unit: bool,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache for entity type `T`
    pub fn cache<T: Cached>(&self) -> &EntityCache<T> {
        T::cache(self)
    }

    pub fn cache_mut<T: Cached>(&mut self) -> &mut EntityCache<T> {
        T::cache_mut(self)
    }

    pub fn departments(&self) -> &EntityCache<Department> {
        &self.departments
    }

    pub fn employees(&self) -> &EntityCache<Employee> {
        &self.employees
    }

    pub fn reviews(&self) -> &EntityCache<Review> {
        &self.reviews
    }

    /// True while a unit of work is journaling changes
    pub fn in_unit(&self) -> bool {
        self.in_unit
    }

    /// Start journaling changes for a unit of work
    pub fn begin_unit(&mut self) {
        self.departments.begin();
        self.employees.begin();
        self.reviews.begin();
        self.in_unit = true;
    }

    /// Keep every journaled change and stop journaling
    pub fn commit_unit(&mut self) {
        self.departments.commit();
        self.employees.commit();
        self.reviews.commit();
        self.in_unit = false;
    }

    /// Undo every journaled change, newest first, and stop journaling
    pub fn rollback_unit(&mut self) {
        self.reviews.rollback();
        self.employees.rollback();
        self.departments.rollback();
        self.in_unit = false;
    }
}

impl Cached for Department {
    fn cache(map: &IdentityMap) -> &EntityCache<Self> {
        &map.departments
    }

    fn cache_mut(map: &mut IdentityMap) -> &mut EntityCache<Self> {
        &mut map.departments
    }
}

impl Cached for Employee {
    fn cache(map: &IdentityMap) -> &EntityCache<Self> {
        &map.employees
    }

    fn cache_mut(map: &mut IdentityMap) -> &mut EntityCache<Self> {
        &mut map.employees
    }
}

impl Cached for Review {
    fn cache(map: &IdentityMap) -> &EntityCache<Self> {
        &map.reviews
    }

    fn cache_mut(map: &mut IdentityMap) -> &mut EntityCache<Self> {
        &mut map.reviews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};
    use crate::model::DepartmentRow;

    fn row(id: i64, name: &str) -> DepartmentRow {
        DepartmentRow {
            id,
            name: Some(name.to_string()),
            location: Some("HQ".to_string()),
        }
    }

    #[test]
    fn test_hydrate_same_row_returns_same_instance() {
        let mut map = IdentityMap::new();
        let first = map.cache_mut::<Department>().hydrate(row(1, "Payroll")).unwrap();
        let second = map
            .cache_mut::<Department>()
            .hydrate(row(1, "Payroll & Benefits"))
            .unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.borrow().name(), "Payroll & Benefits");
        assert_eq!(map.departments().len(), 1);
    }

    #[test]
    fn test_hydrate_conflicting_borrow_is_an_error() {
        let mut map = IdentityMap::new();
        let first = map.cache_mut::<Department>().hydrate(row(1, "Payroll")).unwrap();
        let _guard = first.borrow();

        let err = map
            .cache_mut::<Department>()
            .hydrate(row(1, "Payroll"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::BorrowConflict);
    }

    #[test]
    fn test_insert_with_assigns_id() {
        let mut map = IdentityMap::new();
        let dept = share(Department::new("Payroll", "HQ").unwrap());
        let id = map
            .cache_mut::<Department>()
            .insert_with(&dept, |_| Ok(7))
            .unwrap();

        assert_eq!(id, 7);
        assert_eq!(dept.borrow().id(), Some(7));
        assert!(Rc::ptr_eq(&map.departments().get(7).unwrap(), &dept));
    }

    #[test]
    fn test_insert_with_borrowed_instance_never_runs_insert() {
        let mut map = IdentityMap::new();
        let dept = share(Department::new("Payroll", "HQ").unwrap());
        let guard = dept.borrow();
        let mut ran = false;

        let err = map
            .cache_mut::<Department>()
            .insert_with(&dept, |_| {
                ran = true;
                Ok(7)
            })
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::BorrowConflict);
        assert!(!ran);
        drop(guard);
        assert_eq!(dept.borrow().id(), None);
        assert!(map.departments().is_empty());
    }

    #[test]
    fn test_failed_insert_leaves_instance_transient() {
        let mut map = IdentityMap::new();
        let dept = share(Department::new("Payroll", "HQ").unwrap());

        let err = map
            .cache_mut::<Department>()
            .insert_with(&dept, |_| Err(ExError::new(ExErrorKind::Persistence)))
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(dept.borrow().id(), None);
        assert!(map.departments().is_empty());
    }

    #[test]
    fn test_update_with_transient_instance_is_missing_id() {
        let mut map = IdentityMap::new();
        let dept = share(Department::new("Payroll", "HQ").unwrap());

        let err = map
            .cache_mut::<Department>()
            .update_with(&dept, |_, _| panic!("update must not run"))
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::MissingId);
        assert!(map.departments().is_empty());
    }

    #[test]
    fn test_update_with_passes_id_and_fields() {
        let mut map = IdentityMap::new();
        let cached = map.cache_mut::<Department>().hydrate(row(4, "Payroll")).unwrap();

        let id = map
            .cache_mut::<Department>()
            .update_with(&cached, |id, dept| {
                assert_eq!(id, 4);
                assert_eq!(dept.name(), "Payroll");
                Ok(())
            })
            .unwrap();

        assert_eq!(id, 4);
        assert!(Rc::ptr_eq(&map.departments().get(4).unwrap(), &cached));
    }

    #[test]
    fn test_delete_with_clears_id_and_entry() {
        let mut map = IdentityMap::new();
        let dept = map.cache_mut::<Department>().hydrate(row(3, "Payroll")).unwrap();
        let deleted = map
            .cache_mut::<Department>()
            .delete_with(&dept, |id| {
                assert_eq!(id, 3);
                Ok(())
            })
            .unwrap();

        assert_eq!(deleted, Some(3));
        assert_eq!(dept.borrow().id(), None);
        assert!(!map.departments().contains(3));
    }

    #[test]
    fn test_delete_with_borrowed_instance_keeps_id_and_entry() {
        let mut map = IdentityMap::new();
        let dept = map.cache_mut::<Department>().hydrate(row(3, "Payroll")).unwrap();
        let guard = dept.borrow();

        let err = map
            .cache_mut::<Department>()
            .delete_with(&dept, |_| panic!("delete must not run"))
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::BorrowConflict);
        assert_eq!(guard.id(), Some(3));
        assert!(map.departments().contains(3));
    }

    #[test]
    fn test_delete_with_transient_instance_is_noop() {
        let mut map = IdentityMap::new();
        let dept = share(Department::new("Payroll", "HQ").unwrap());

        let deleted = map
            .cache_mut::<Department>()
            .delete_with(&dept, |_| panic!("delete must not run"))
            .unwrap();

        assert_eq!(deleted, None);
    }

    #[test]
    fn test_rollback_undoes_changes_in_reverse() {
        let mut map = IdentityMap::new();
        let kept = map.cache_mut::<Department>().hydrate(row(1, "Payroll")).unwrap();

        map.begin_unit();
        assert!(map.in_unit());
        let fresh = share(Department::new("Legal", "HQ").unwrap());
        map.cache_mut::<Department>()
            .insert_with(&fresh, |_| Ok(2))
            .unwrap();
        map.cache_mut::<Department>().hydrate(row(1, "Renamed")).unwrap();
        map.cache_mut::<Department>()
            .delete_with(&kept, |_| Ok(()))
            .unwrap();
        map.rollback_unit();

        assert!(!map.in_unit());
        assert_eq!(fresh.borrow().id(), None);
        assert!(!map.departments().contains(2));
        assert_eq!(kept.borrow().id(), Some(1));
        assert_eq!(kept.borrow().name(), "Payroll");
        assert!(Rc::ptr_eq(&map.departments().get(1).unwrap(), &kept));
    }

    #[test]
    fn test_commit_keeps_changes() {
        let mut map = IdentityMap::new();
        map.begin_unit();
        let fresh = share(Department::new("Legal", "HQ").unwrap());
        map.cache_mut::<Department>()
            .insert_with(&fresh, |_| Ok(2))
            .unwrap();
        map.commit_unit();
        map.rollback_unit();

        assert_eq!(fresh.borrow().id(), Some(2));
        assert_eq!(map.departments().ids(), vec![2]);
    }
}
