use rebac_types::CheckItem;

/// Everything two check items must agree on to share one engine dispatch.
///
/// The caveat context takes part through its canonical bytes; `None` stands for an absent
/// or empty context and never equals an encoded one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupingKey {
    resource_type: String,
    permission: String,
    subject_type: String,
    subject_id: String,
    subject_relation: Option<String>,
    context: Option<Vec<u8>>,
}

impl GroupingKey {
    pub fn new(item: &CheckItem, canonical_context: Option<Vec<u8>>) -> Self {
        Self {
            resource_type: item.resource.object_type.clone(),
            permission: item.permission.clone(),
            subject_type: item.subject.object.object_type.clone(),
            subject_id: item.subject.object.object_id.clone(),
            subject_relation: item.subject.relation().map(str::to_string),
            context: canonical_context,
        }
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }
}
