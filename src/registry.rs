//! Sidecar relationship graphs
//!
//! Cross-cutting associations the analysis pipeline produces that tree
//! containment cannot express: widget/state bindings, lifecycle-method
//! classification, the call graph, the field-access graph, inheritance and
//! interface edges, and build-output mapping.
//!
//! Entries are plain string identifiers. They may reference entities that do
//! not appear in the same file's tree section (cross-file edges); the codec
//! never resolves or validates them. Entries keep insertion order so a
//! re-encode is byte-stable.

use serde::{Deserialize, Serialize};

/// Lifecycle-method classification for a state class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LifecycleKind {
    InitState = 0,
    DidChangeDependencies = 1,
    DidUpdateWidget = 2,
    Activate = 3,
    Deactivate = 4,
    Dispose = 5,
    Reassemble = 6,
}

impl LifecycleKind {
    /// Decode from the wire byte
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::InitState),
            1 => Some(Self::DidChangeDependencies),
            2 => Some(Self::DidUpdateWidget),
            3 => Some(Self::Activate),
            4 => Some(Self::Deactivate),
            5 => Some(Self::Dispose),
            6 => Some(Self::Reassemble),
            _ => None,
        }
    }
}

/// A widget-class ↔ state-class binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetStateBinding {
    pub widget_id: String,
    pub state_id: String,
}

/// One classified lifecycle method of a state class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleMethod {
    pub kind: LifecycleKind,
    pub method_id: String,
}

/// All classified lifecycle methods of one state class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEntry {
    pub state_id: String,
    pub methods: Vec<LifecycleMethod>,
}

/// A state-class → build-method binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMethodBinding {
    pub state_id: String,
    pub method_id: String,
}

/// One caller and everything it calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphEntry {
    pub caller: String,
    pub callees: Vec<String>,
}

/// One method and every field it reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAccessEntry {
    pub method: String,
    pub fields: Vec<String>,
}

/// A subclass → superclass-name edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEdge {
    pub subclass: String,
    pub superclass: String,
}

/// An interface name and its implementers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceImplEntry {
    pub interface: String,
    pub implementers: Vec<String>,
}

/// A widget class and the runtime output name it builds into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub class_id: String,
    pub widget_name: String,
}

/// The full sidecar registry serialized next to the tree section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipRegistry {
    pub widget_states: Vec<WidgetStateBinding>,
    pub lifecycle: Vec<LifecycleEntry>,
    pub build_methods: Vec<BuildMethodBinding>,
    pub call_graph: Vec<CallGraphEntry>,
    pub field_access: Vec<FieldAccessEntry>,
    pub class_hierarchy: Vec<HierarchyEdge>,
    pub interface_impls: Vec<InterfaceImplEntry>,
    pub build_outputs: Vec<BuildOutput>,
}

impl RelationshipRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a widget ↔ state binding
    pub fn bind_widget_state(&mut self, widget_id: impl Into<String>, state_id: impl Into<String>) {
        self.widget_states.push(WidgetStateBinding {
            widget_id: widget_id.into(),
            state_id: state_id.into(),
        });
    }

    /// Record a classified lifecycle method, grouping by state id
    pub fn add_lifecycle_method(
        &mut self,
        state_id: &str,
        kind: LifecycleKind,
        method_id: impl Into<String>,
    ) {
        let method = LifecycleMethod {
            kind,
            method_id: method_id.into(),
        };
        match self.lifecycle.iter_mut().find(|e| e.state_id == state_id) {
            Some(entry) => entry.methods.push(method),
            None => self.lifecycle.push(LifecycleEntry {
                state_id: state_id.to_string(),
                methods: vec![method],
            }),
        }
    }

    /// Record a state → build-method binding
    pub fn add_build_method(&mut self, state_id: impl Into<String>, method_id: impl Into<String>) {
        self.build_methods.push(BuildMethodBinding {
            state_id: state_id.into(),
            method_id: method_id.into(),
        });
    }

    /// Record a call edge, grouping by caller
    pub fn add_call(&mut self, caller: &str, callee: impl Into<String>) {
        let callee = callee.into();
        match self.call_graph.iter_mut().find(|e| e.caller == caller) {
            Some(entry) => entry.callees.push(callee),
            None => self.call_graph.push(CallGraphEntry {
                caller: caller.to_string(),
                callees: vec![callee],
            }),
        }
    }

    /// Record a field access, grouping by method
    pub fn add_field_access(&mut self, method: &str, field: impl Into<String>) {
        let field = field.into();
        match self.field_access.iter_mut().find(|e| e.method == method) {
            Some(entry) => entry.fields.push(field),
            None => self.field_access.push(FieldAccessEntry {
                method: method.to_string(),
                fields: vec![field],
            }),
        }
    }

    /// Record an inheritance edge
    pub fn add_superclass(&mut self, subclass: impl Into<String>, superclass: impl Into<String>) {
        self.class_hierarchy.push(HierarchyEdge {
            subclass: subclass.into(),
            superclass: superclass.into(),
        });
    }

    /// Record an interface implementation, grouping by interface name
    pub fn add_interface_impl(&mut self, interface: &str, implementer: impl Into<String>) {
        let implementer = implementer.into();
        match self
            .interface_impls
            .iter_mut()
            .find(|e| e.interface == interface)
        {
            Some(entry) => entry.implementers.push(implementer),
            None => self.interface_impls.push(InterfaceImplEntry {
                interface: interface.to_string(),
                implementers: vec![implementer],
            }),
        }
    }

    /// Record a build-output mapping
    pub fn add_build_output(&mut self, class_id: impl Into<String>, widget_name: impl Into<String>) {
        self.build_outputs.push(BuildOutput {
            class_id: class_id.into(),
            widget_name: widget_name.into(),
        });
    }

    /// Is every graph empty?
    pub fn is_empty(&self) -> bool {
        self.widget_states.is_empty()
            && self.lifecycle.is_empty()
            && self.build_methods.is_empty()
            && self.call_graph.is_empty()
            && self.field_access.is_empty()
            && self.class_hierarchy.is_empty()
            && self.interface_impls.is_empty()
            && self.build_outputs.is_empty()
    }

    /// Callees recorded for a caller, if any
    pub fn callees_of(&self, caller: &str) -> Option<&[String]> {
        self.call_graph
            .iter()
            .find(|e| e.caller == caller)
            .map(|e| e.callees.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_grouping() {
        let mut reg = RelationshipRegistry::new();
        reg.add_call("A.build", "Text");
        reg.add_call("A.build", "Column");
        reg.add_call("B.build", "Row");

        assert_eq!(reg.call_graph.len(), 2);
        assert_eq!(reg.callees_of("A.build").unwrap().len(), 2);
        assert_eq!(reg.callees_of("C.build"), None);
    }

    #[test]
    fn test_lifecycle_grouping() {
        let mut reg = RelationshipRegistry::new();
        reg.add_lifecycle_method("_CounterState", LifecycleKind::InitState, "initState");
        reg.add_lifecycle_method("_CounterState", LifecycleKind::Dispose, "dispose");

        assert_eq!(reg.lifecycle.len(), 1);
        assert_eq!(reg.lifecycle[0].methods.len(), 2);
    }

    #[test]
    fn test_is_empty() {
        let mut reg = RelationshipRegistry::new();
        assert!(reg.is_empty());
        reg.add_superclass("Counter", "StatefulWidget");
        assert!(!reg.is_empty());
    }

    #[test]
    fn test_lifecycle_kind_from_u8() {
        assert_eq!(LifecycleKind::from_u8(0), Some(LifecycleKind::InitState));
        assert_eq!(LifecycleKind::from_u8(6), Some(LifecycleKind::Reassemble));
        assert_eq!(LifecycleKind::from_u8(7), None);
    }
}
