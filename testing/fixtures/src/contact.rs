use patchdb::{field_table, prelude::*};

///
/// Contact
///
/// Person attached to a client; exists to exercise a second record type
/// against the same store and counters.
///

#[derive(Clone, Debug)]
pub struct Contact {
    pub id: RecordId,
    pub client_id: RecordId,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl Record for Contact {
    const PATH: &'static str = "fixtures::Contact";
    const FIELDS: &'static [FieldAccessor<Self>] = field_table!(Contact {
        client_id => |c: &Contact| FieldValue::from(c.client_id),
        name => |c: &Contact| FieldValue::from(c.name.clone()),
        email => |c: &Contact| FieldValue::from(c.email.clone()),
        role => |c: &Contact| FieldValue::from(c.role.clone()),
    });

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_id(id: RecordId) -> Self {
        Self {
            id,
            client_id: RecordId::nil(),
            name: String::new(),
            email: None,
            role: None,
        }
    }
}

///
/// ContactPatch
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ContactPatch {
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub name: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub email: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub role: TriState<String>,
}

impl PatchView<Contact> for ContactPatch {
    fn validate(&self) -> Result<(), OpError> {
        if self.name.is_null() {
            return Err(OpError::validation("name cannot be cleared"));
        }
        if let Some(name) = self.name.get()
            && name.is_empty()
        {
            return Err(OpError::validation("name must not be empty"));
        }

        Ok(())
    }

    fn apply(&self, entity: &mut Contact) -> TouchedFields {
        let mut touched = TouchedFields::new();

        if let TriState::Value(name) = &self.name {
            entity.name = name.clone();
            touched.insert("name");
        }
        if !self.email.is_absent() {
            entity.email = self.email.clone().into_option();
            touched.insert("email");
        }
        if !self.role.is_absent() {
            entity.role = self.role.clone().into_option();
            touched.insert("role");
        }

        touched
    }
}
