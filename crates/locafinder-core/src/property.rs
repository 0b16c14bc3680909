//! Change-detecting state cells.
//!
//! A [`Property`] holds one piece of component state behind a lock and
//! reports whether a write changed it, so the owner emits its signal only
//! on real changes:
//!
//! ```
//! use locafinder_core::{Property, Signal};
//!
//! let busy = Property::new(false);
//! let busy_changed = Signal::<bool>::new();
//!
//! for value in [true, true, false] {
//!     if busy.set(value) {
//!         busy_changed.emit(value);
//!     }
//! }
//! assert!(!busy.get());
//! ```

use std::fmt;

use parking_lot::RwLock;

/// Interior-mutable value with change detection on write.
#[derive(Default)]
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Overwrite the value without comparing.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Move the value out, leaving `T::default()`.
    pub fn take(&self) -> T
    where
        T: Default,
    {
        std::mem::take(&mut *self.value.write())
    }

    /// Read-only view to hand out while keeping writes private.
    pub fn view(&self) -> ReadOnlyProperty<'_, T> {
        ReadOnlyProperty { inner: self }
    }
}

impl<T: Clone> Property<T> {
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: PartialEq> Property<T> {
    /// Store `value`. Returns `true` if it differs from the old value.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Store `value` and hand back the old one, or `None` if nothing changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        (*current != value).then(|| std::mem::replace(&mut *current, value))
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("Property").field(value).finish())
    }
}

/// Borrowed read access to a [`Property`].
#[derive(Clone, Copy)]
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<T> ReadOnlyProperty<'_, T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }
}

impl<T: Clone> ReadOnlyProperty<'_, T> {
    pub fn get(&self) -> T {
        self.inner.get()
    }
}
