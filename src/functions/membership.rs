use super::arg;
use crate::types::{RuleVariableValueMap, SupplementaryData};

/// Environment variable holding the organisation unit of the target record.
const ORG_UNIT: &str = "org_unit";

/// Whether the target's organisation unit belongs to the named group.
pub(super) fn in_org_unit_group(
    args: &[Option<String>],
    values: &RuleVariableValueMap,
    supplementary: &SupplementaryData,
) -> String {
    let org_unit = values.get(ORG_UNIT).and_then(|v| v.value());
    let member = match (org_unit, supplementary.get(arg(args, 0))) {
        (Some(org_unit), Some(members)) => members.iter().any(|m| m == org_unit),
        _ => false,
    };
    member.to_string()
}
