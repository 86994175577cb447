pub(crate) mod identifiers;

pub(crate) use identifiers::{operation_name, ref_name, select_field_name, to_field_name, to_type_name};
