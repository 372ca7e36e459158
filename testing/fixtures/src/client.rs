use patchdb::{field_table, prelude::*};

///
/// ClientKind
///
/// Legal personality of a client; decides the registration number
/// format (14 digits for companies, 11 for natural persons).
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    Company,
    Person,
}

impl ClientKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Person => "person",
        }
    }

    #[must_use]
    pub const fn register_len(self) -> usize {
        match self {
            Self::Company => 14,
            Self::Person => 11,
        }
    }
}

///
/// Client
///

#[derive(Clone, Debug)]
pub struct Client {
    pub id: RecordId,
    pub kind: ClientKind,
    pub register: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headquarters_id: Option<RecordId>,
    pub updated_at_ms: u64,
    pub updater: Option<RecordId>,
}

impl Record for Client {
    const PATH: &'static str = "fixtures::Client";
    const FIELDS: &'static [FieldAccessor<Self>] = field_table!(Client {
        kind => |c: &Client| FieldValue::from(c.kind.as_str()),
        register => |c: &Client| FieldValue::from(c.register.clone()),
        name => |c: &Client| FieldValue::from(c.name.clone()),
        legal_name => |c: &Client| FieldValue::from(c.legal_name.clone()),
        email => |c: &Client| FieldValue::from(c.email.clone()),
        phone => |c: &Client| FieldValue::from(c.phone.clone()),
        headquarters_id => |c: &Client| FieldValue::from(c.headquarters_id),
        updated_at_ms => |c: &Client| FieldValue::from(c.updated_at_ms),
        updater => |c: &Client| FieldValue::from(c.updater),
    });

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_id(id: RecordId) -> Self {
        Self {
            id,
            kind: ClientKind::Company,
            register: String::new(),
            name: String::new(),
            legal_name: None,
            email: None,
            phone: None,
            headquarters_id: None,
            updated_at_ms: 0,
            updater: None,
        }
    }
}

fn check_register(register: &str) -> Result<(), OpError> {
    if !register.chars().all(|c| c.is_ascii_digit()) {
        return Err(OpError::validation("register must contain only digits"));
    }
    if register.len() != ClientKind::Company.register_len()
        && register.len() != ClientKind::Person.register_len()
    {
        return Err(OpError::validation("register must be 11 or 14 digits"));
    }

    Ok(())
}

fn check_email(email: &str) -> Result<(), OpError> {
    if !email.contains('@') {
        return Err(OpError::validation("email must contain '@'"));
    }

    Ok(())
}

///
/// ClientCreate
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClientCreate {
    pub id: RecordId,
    pub kind: ClientKind,
    pub register: String,
    pub name: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub headquarters_id: Option<RecordId>,
}

impl CreateView<Client> for ClientCreate {
    fn validate(&self) -> Result<(), OpError> {
        if self.name.is_empty() {
            return Err(OpError::validation("name must not be empty"));
        }
        if !self.register.chars().all(|c| c.is_ascii_digit())
            || self.register.len() != self.kind.register_len()
        {
            return Err(OpError::validation(format!(
                "a {} register must be {} digits",
                self.kind.as_str(),
                self.kind.register_len()
            )));
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }

        Ok(())
    }

    fn into_record(self) -> Client {
        Client {
            id: self.id,
            kind: self.kind,
            register: self.register,
            name: self.name,
            legal_name: self.legal_name,
            email: self.email,
            phone: self.phone,
            headquarters_id: self.headquarters_id,
            updated_at_ms: 0,
            updater: None,
        }
    }
}

///
/// ClientPatch
///
/// Partial-update payload for [`Client`]. Absent keys leave the stored
/// attribute alone; explicit nulls clear nullable attributes.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub register: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub name: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub legal_name: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub email: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub phone: TriState<String>,
    #[serde(default, skip_serializing_if = "TriState::is_absent")]
    pub headquarters_id: TriState<RecordId>,
}

impl PatchView<Client> for ClientPatch {
    fn validate(&self) -> Result<(), OpError> {
        if self.name.is_null() {
            return Err(OpError::validation("name cannot be cleared"));
        }
        if let Some(name) = self.name.get()
            && name.is_empty()
        {
            return Err(OpError::validation("name must not be empty"));
        }
        if self.register.is_null() {
            return Err(OpError::validation("register cannot be cleared"));
        }
        if let Some(register) = self.register.get() {
            check_register(register)?;
        }
        if let Some(email) = self.email.get() {
            check_email(email)?;
        }

        Ok(())
    }

    fn apply(&self, entity: &mut Client) -> TouchedFields {
        let mut touched = TouchedFields::new();

        if let TriState::Value(register) = &self.register {
            entity.register = register.clone();
            touched.insert("register");
        }
        if let TriState::Value(name) = &self.name {
            entity.name = name.clone();
            touched.insert("name");
        }
        if !self.legal_name.is_absent() {
            entity.legal_name = self.legal_name.clone().into_option();
            touched.insert("legal_name");
        }
        if !self.email.is_absent() {
            entity.email = self.email.clone().into_option();
            touched.insert("email");
        }
        if !self.phone.is_absent() {
            entity.phone = self.phone.clone().into_option();
            touched.insert("phone");
        }
        if !self.headquarters_id.is_absent() {
            entity.headquarters_id = self.headquarters_id.clone().into_option();
            touched.insert("headquarters_id");
        }

        touched
    }
}
