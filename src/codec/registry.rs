//! Relationship-registry codec
//!
//! A 16-bit flag word followed by only the subsections whose bit is set, so
//! files stay small when an analysis produced no data for a category. Each
//! subsection is a flat count-prefixed list of string refs; no recursion.

use crate::error::{CodecError, CodecResult};
use crate::registry::{
    BuildMethodBinding, BuildOutput, CallGraphEntry, FieldAccessEntry, HierarchyEdge,
    InterfaceImplEntry, LifecycleEntry, LifecycleKind, LifecycleMethod, RelationshipRegistry,
    WidgetStateBinding,
};

use super::{DecodeContext, EncodeContext, MAX_SEQ_LEN};

const REL_WIDGET_STATE: u16 = 1 << 0;
const REL_LIFECYCLE: u16 = 1 << 1;
const REL_CALL_GRAPH: u16 = 1 << 2;
const REL_FIELD_ACCESS: u16 = 1 << 3;
const REL_CLASS_HIERARCHY: u16 = 1 << 4;
const REL_INTERFACE_IMPLS: u16 = 1 << 5;
const REL_BUILD_OUTPUTS: u16 = 1 << 6;

/// Lifecycle method lists are length-prefixed with a single byte.
const MAX_LIFECYCLE_METHODS: usize = u8::MAX as usize;

fn section_flags(reg: &RelationshipRegistry) -> u16 {
    let mut flags = 0;
    if !reg.widget_states.is_empty() {
        flags |= REL_WIDGET_STATE;
    }
    if !reg.lifecycle.is_empty() || !reg.build_methods.is_empty() {
        flags |= REL_LIFECYCLE;
    }
    if !reg.call_graph.is_empty() {
        flags |= REL_CALL_GRAPH;
    }
    if !reg.field_access.is_empty() {
        flags |= REL_FIELD_ACCESS;
    }
    if !reg.class_hierarchy.is_empty() {
        flags |= REL_CLASS_HIERARCHY;
    }
    if !reg.interface_impls.is_empty() {
        flags |= REL_INTERFACE_IMPLS;
    }
    if !reg.build_outputs.is_empty() {
        flags |= REL_BUILD_OUTPUTS;
    }
    flags
}

fn encode_ref_groups(
    ctx: &mut EncodeContext,
    what: &'static str,
    groups: &[(&str, &[String])],
) -> CodecResult<()> {
    ctx.write_seq_len(what, groups.len(), MAX_SEQ_LEN)?;
    for (key, members) in groups {
        ctx.write_str_ref(key);
        ctx.write_seq_len(what, members.len(), MAX_SEQ_LEN)?;
        for member in members.iter() {
            ctx.write_str_ref(member);
        }
    }
    Ok(())
}

fn decode_ref_groups(
    ctx: &mut DecodeContext<'_>,
    what: &'static str,
) -> CodecResult<Vec<(String, Vec<String>)>> {
    let count = ctx.read_seq_len(what, MAX_SEQ_LEN)?;
    let mut groups = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        let key = ctx.read_str_ref()?;
        let member_count = ctx.read_seq_len(what, MAX_SEQ_LEN)?;
        let mut members = Vec::with_capacity(member_count.min(4096));
        for _ in 0..member_count {
            members.push(ctx.read_str_ref()?);
        }
        groups.push((key, members));
    }
    Ok(groups)
}

pub(crate) fn encode_registry(ctx: &mut EncodeContext, reg: &RelationshipRegistry) -> CodecResult<()> {
    let flags = section_flags(reg);
    ctx.w.write_u16(flags);

    if flags & REL_WIDGET_STATE != 0 {
        ctx.write_seq_len("widget-state binding", reg.widget_states.len(), MAX_SEQ_LEN)?;
        for b in &reg.widget_states {
            ctx.write_str_ref(&b.widget_id);
            ctx.write_str_ref(&b.state_id);
        }
    }

    if flags & REL_LIFECYCLE != 0 {
        ctx.write_seq_len("lifecycle entry", reg.lifecycle.len(), MAX_SEQ_LEN)?;
        for entry in &reg.lifecycle {
            ctx.write_str_ref(&entry.state_id);
            if entry.methods.len() > MAX_LIFECYCLE_METHODS {
                return Err(CodecError::CountTooLarge {
                    what: "lifecycle method",
                    count: entry.methods.len(),
                    max: MAX_LIFECYCLE_METHODS,
                    offset: ctx.w.len(),
                });
            }
            ctx.w.write_u8(entry.methods.len() as u8);
            for m in &entry.methods {
                ctx.w.write_u8(m.kind as u8);
                ctx.write_str_ref(&m.method_id);
            }
        }
        ctx.write_seq_len("build method", reg.build_methods.len(), MAX_SEQ_LEN)?;
        for b in &reg.build_methods {
            ctx.write_str_ref(&b.state_id);
            ctx.write_str_ref(&b.method_id);
        }
    }

    if flags & REL_CALL_GRAPH != 0 {
        let groups: Vec<(&str, &[String])> = reg
            .call_graph
            .iter()
            .map(|e| (e.caller.as_str(), e.callees.as_slice()))
            .collect();
        encode_ref_groups(ctx, "call-graph entry", &groups)?;
    }

    if flags & REL_FIELD_ACCESS != 0 {
        let groups: Vec<(&str, &[String])> = reg
            .field_access
            .iter()
            .map(|e| (e.method.as_str(), e.fields.as_slice()))
            .collect();
        encode_ref_groups(ctx, "field-access entry", &groups)?;
    }

    if flags & REL_CLASS_HIERARCHY != 0 {
        ctx.write_seq_len("hierarchy edge", reg.class_hierarchy.len(), MAX_SEQ_LEN)?;
        for edge in &reg.class_hierarchy {
            ctx.write_str_ref(&edge.subclass);
            ctx.write_str_ref(&edge.superclass);
        }
    }

    if flags & REL_INTERFACE_IMPLS != 0 {
        let groups: Vec<(&str, &[String])> = reg
            .interface_impls
            .iter()
            .map(|e| (e.interface.as_str(), e.implementers.as_slice()))
            .collect();
        encode_ref_groups(ctx, "interface-impl entry", &groups)?;
    }

    if flags & REL_BUILD_OUTPUTS != 0 {
        ctx.write_seq_len("build output", reg.build_outputs.len(), MAX_SEQ_LEN)?;
        for out in &reg.build_outputs {
            ctx.write_str_ref(&out.class_id);
            ctx.write_str_ref(&out.widget_name);
        }
    }

    Ok(())
}

pub(crate) fn decode_registry(ctx: &mut DecodeContext<'_>) -> CodecResult<RelationshipRegistry> {
    let flags = ctx.r.read_u16()?;
    let mut reg = RelationshipRegistry::new();

    if flags & REL_WIDGET_STATE != 0 {
        let count = ctx.read_seq_len("widget-state binding", MAX_SEQ_LEN)?;
        for _ in 0..count {
            let widget_id = ctx.read_str_ref()?;
            let state_id = ctx.read_str_ref()?;
            reg.widget_states.push(WidgetStateBinding {
                widget_id,
                state_id,
            });
        }
    }

    if flags & REL_LIFECYCLE != 0 {
        let count = ctx.read_seq_len("lifecycle entry", MAX_SEQ_LEN)?;
        for _ in 0..count {
            let state_id = ctx.read_str_ref()?;
            let method_count = ctx.r.read_u8()? as usize;
            let mut methods = Vec::with_capacity(method_count);
            for _ in 0..method_count {
                let kind_offset = ctx.r.offset();
                let raw = ctx.r.read_u8()?;
                let kind = LifecycleKind::from_u8(raw)
                    .ok_or_else(|| CodecError::unknown_tag("lifecycle kind", raw, kind_offset))?;
                let method_id = ctx.read_str_ref()?;
                methods.push(LifecycleMethod { kind, method_id });
            }
            reg.lifecycle.push(LifecycleEntry { state_id, methods });
        }
        let build_count = ctx.read_seq_len("build method", MAX_SEQ_LEN)?;
        for _ in 0..build_count {
            let state_id = ctx.read_str_ref()?;
            let method_id = ctx.read_str_ref()?;
            reg.build_methods.push(BuildMethodBinding {
                state_id,
                method_id,
            });
        }
    }

    if flags & REL_CALL_GRAPH != 0 {
        for (caller, callees) in decode_ref_groups(ctx, "call-graph entry")? {
            reg.call_graph.push(CallGraphEntry { caller, callees });
        }
    }

    if flags & REL_FIELD_ACCESS != 0 {
        for (method, fields) in decode_ref_groups(ctx, "field-access entry")? {
            reg.field_access.push(FieldAccessEntry { method, fields });
        }
    }

    if flags & REL_CLASS_HIERARCHY != 0 {
        let count = ctx.read_seq_len("hierarchy edge", MAX_SEQ_LEN)?;
        for _ in 0..count {
            let subclass = ctx.read_str_ref()?;
            let superclass = ctx.read_str_ref()?;
            reg.class_hierarchy.push(HierarchyEdge {
                subclass,
                superclass,
            });
        }
    }

    if flags & REL_INTERFACE_IMPLS != 0 {
        for (interface, implementers) in decode_ref_groups(ctx, "interface-impl entry")? {
            reg.interface_impls.push(InterfaceImplEntry {
                interface,
                implementers,
            });
        }
    }

    if flags & REL_BUILD_OUTPUTS != 0 {
        let count = ctx.read_seq_len("build output", MAX_SEQ_LEN)?;
        for _ in 0..count {
            let class_id = ctx.read_str_ref()?;
            let widget_name = ctx.read_str_ref()?;
            reg.build_outputs.push(BuildOutput {
                class_id,
                widget_name,
            });
        }
    }

    Ok(reg)
}
