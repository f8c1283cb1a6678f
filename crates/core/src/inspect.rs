//! Descriptor inspection utilities.
//!
//! Predicates and extraction helpers that classify a descriptor into one of
//! the shape variants and pull out its parts. Every function here sees
//! through an [`Descriptor::Annotated`] wrapper, and the unwrap helpers
//! re-wrap the extracted shape in the outer annotation metadata so the
//! metadata survives the transform.
//!
//! Because the smart constructors normalize nullable unions to
//! `Optional(Union(..))`, the "2-member union with a null member" and
//! "3-member union including null" cases of the source model both appear
//! here as optionals; [`is_strict_optional`] distinguishes them.

use crate::descriptor::{Descriptor, Primitive};
use crate::JsonValue;

/// Strips an annotation wrapper, if any.
pub fn unwrap_annotated(desc: &Descriptor) -> &Descriptor {
    match desc {
        Descriptor::Annotated(inner, _) => inner,
        other => other,
    }
}

pub fn is_annotated(desc: &Descriptor) -> bool {
    matches!(desc, Descriptor::Annotated(..))
}

/// First-match lookup of annotation metadata by tag. Absence is not an
/// error: a caller that does not look for the tag treats the type as plain.
pub fn get_annotation<'a>(desc: &'a Descriptor, tag: &str) -> Option<&'a JsonValue> {
    match desc {
        Descriptor::Annotated(_, bag) => bag.iter().find(|a| a.tag == tag).map(|a| &a.value),
        _ => None,
    }
}

/// Re-wraps a transformed shape in the annotation metadata of the original,
/// so extraction does not discard metadata.
fn rewrap(original: &Descriptor, extracted: Descriptor) -> Descriptor {
    match original {
        Descriptor::Annotated(_, bag) => Descriptor::annotated(extracted, bag.clone()),
        _ => extracted,
    }
}

pub fn is_optional(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Optional(_))
}

/// True only for an optional with a single non-null member (the 2-member
/// union case). A nullable union of several members is optional, but not
/// strictly so.
pub fn is_strict_optional(desc: &Descriptor) -> bool {
    match unwrap_annotated(desc) {
        Descriptor::Optional(inner) => !matches!(inner.as_ref(), Descriptor::Union(_)),
        _ => false,
    }
}

/// Extracts the inner shape of an optional: the single non-null member, or
/// the reduced union when more than one remained.
pub fn unwrap_optional(desc: &Descriptor) -> Option<Descriptor> {
    match unwrap_annotated(desc) {
        Descriptor::Optional(inner) => Some(rewrap(desc, inner.as_ref().clone())),
        _ => None,
    }
}

/// True for a union of two or more non-null members, nullable or not.
pub fn is_union(desc: &Descriptor) -> bool {
    match unwrap_annotated(desc) {
        Descriptor::Union(_) => true,
        Descriptor::Optional(inner) => matches!(inner.as_ref(), Descriptor::Union(_)),
        _ => false,
    }
}

/// The ordered non-null members of a union, seeing through an optional
/// wrapper.
pub fn union_members(desc: &Descriptor) -> Option<&[Descriptor]> {
    match unwrap_annotated(desc) {
        Descriptor::Union(members) => Some(members),
        Descriptor::Optional(inner) => match inner.as_ref() {
            Descriptor::Union(members) => Some(members),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_list(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::List(_))
}

pub fn list_item(desc: &Descriptor) -> Option<Descriptor> {
    match unwrap_annotated(desc) {
        Descriptor::List(item) => Some(rewrap(desc, item.as_ref().clone())),
        _ => None,
    }
}

pub fn is_set(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Set(_))
}

pub fn set_item(desc: &Descriptor) -> Option<Descriptor> {
    match unwrap_annotated(desc) {
        Descriptor::Set(item) => Some(rewrap(desc, item.as_ref().clone())),
        _ => None,
    }
}

pub fn is_map(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Map(..))
}

/// The key and value shapes of a map.
pub fn map_entry(desc: &Descriptor) -> Option<(Descriptor, Descriptor)> {
    match unwrap_annotated(desc) {
        Descriptor::Map(key, value) => Some((
            rewrap(desc, key.as_ref().clone()),
            rewrap(desc, value.as_ref().clone()),
        )),
        _ => None,
    }
}

pub fn is_tuple(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Tuple(_))
}

pub fn tuple_items(desc: &Descriptor) -> Option<&[Descriptor]> {
    match unwrap_annotated(desc) {
        Descriptor::Tuple(members) => Some(members),
        _ => None,
    }
}

pub fn is_enum(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Enum(_))
}

pub fn is_record(desc: &Descriptor) -> bool {
    matches!(unwrap_annotated(desc), Descriptor::Record(_))
}

/// True for the named-tuple-like record shapes (ordered, named, positional
/// fields). They take the record path in the codec; the marker only matters
/// to callers that care about the distinction.
pub fn is_named_tuple(desc: &Descriptor) -> bool {
    match unwrap_annotated(desc) {
        Descriptor::Record(r) => r.kind == crate::descriptor::RecordKind::NamedTuple,
        _ => false,
    }
}

/// Flattened, duplicate-free, first-seen-order list of the leaf shapes a
/// descriptor depends on: primitives other than null, enumerations, records
/// and customs. Records count as leaves (their fields are not traversed),
/// matching the use case of building a registry of related types.
pub fn referenced_types(desc: &Descriptor) -> Vec<&Descriptor> {
    let mut out = Vec::new();
    collect_referenced(desc, &mut out);
    out
}

fn collect_referenced<'a>(desc: &'a Descriptor, out: &mut Vec<&'a Descriptor>) {
    match desc {
        Descriptor::Annotated(inner, _) | Descriptor::Optional(inner) => {
            collect_referenced(inner, out)
        }
        Descriptor::Union(members) | Descriptor::Tuple(members) => {
            for m in members {
                collect_referenced(m, out);
            }
        }
        Descriptor::List(item) | Descriptor::Set(item) => collect_referenced(item, out),
        Descriptor::Map(key, value) => {
            collect_referenced(key, out);
            collect_referenced(value, out);
        }
        Descriptor::Primitive(Primitive::Null) => {}
        leaf => {
            if !out.iter().any(|seen| *seen == leaf) {
                out.push(leaf);
            }
        }
    }
}
