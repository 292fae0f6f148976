//! Local slot allocation.
//!
//! Every local of a function gets exactly one slot. A shadowing declaration
//! arrives under its own local name, so it never shares a slot with the
//! binding it hides. Parameters take the first indices in declaration order;
//! other locals are numbered in the order the emitter first touches them. The
//! prologue is built from this table after the body has been emitted.

use std::collections::HashMap;

use crate::ast::types::NumType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: u32,
    pub ty: NumType,
}

#[derive(Debug, Default)]
pub struct SlotTable {
    slots: HashMap<String, Slot>,
    /// Names in index order.
    order: Vec<String>,
    parameter_count: u32,
}

impl SlotTable {
    pub fn new() -> Self {
        SlotTable::default()
    }

    /// Allocates the next slot for a parameter.
    ///
    /// Must be called for every parameter before any other local.
    pub fn add_parameter(&mut self, name: &str, ty: NumType) -> Slot {
        let slot = self.get_or_alloc(name, ty);
        self.parameter_count = self.order.len() as u32;
        slot
    }

    /// Returns the slot for `name`, allocating one of type `ty` if it has none.
    pub fn get_or_alloc(&mut self, name: &str, ty: NumType) -> Slot {
        if let Some(slot) = self.slots.get(name) {
            return *slot;
        }

        let slot = Slot {
            index: self.order.len() as u32,
            ty,
        };
        log::trace!("slot {} for `{}` ({})", slot.index, name, ty);

        self.slots.insert(name.to_string(), slot);
        self.order.push(name.to_string());
        slot
    }

    pub fn get(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).copied()
    }

    /// Non-parameter locals in slot order.
    pub fn locals(&self) -> impl Iterator<Item = (&str, Slot)> + '_ {
        self.order
            .iter()
            .skip(self.parameter_count as usize)
            .filter_map(|name| self.slots.get(name).map(|slot| (name.as_str(), *slot)))
    }
}
