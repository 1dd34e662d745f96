//! Business records and request validation

use serde::Deserialize;
use sqlx::FromRow;

use super::validation::{max_len, required};
use super::ValidationError;

const MAX_NAME_LEN: usize = 50;
const MAX_STREET_ADDRESS_LEN: usize = 100;
const MAX_CITY_LEN: usize = 50;
const MAX_STATE_LEN: usize = 2;

/// Business row from the `businesses` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Business {
    pub business_id: i64,
    pub owner_id: i32,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: i32,
}

/// Body of `POST /businesses` and `PUT /businesses/{id}`.
///
/// Every attribute is optional at the JSON level so that absence maps to
/// a 400 with a uniform message instead of a deserializer error.
#[derive(Debug, Default, Deserialize)]
pub struct BusinessRequest {
    pub owner_id: Option<i32>,
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<i32>,
}

/// Validated business attributes, ready to insert or to replace a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusiness {
    pub owner_id: i32,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: i32,
}

impl NewBusiness {
    /// Attach a row id.
    pub fn with_id(self, business_id: i64) -> Business {
        Business {
            business_id,
            owner_id: self.owner_id,
            name: self.name,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
    }
}

impl TryFrom<BusinessRequest> for NewBusiness {
    type Error = ValidationError;

    fn try_from(req: BusinessRequest) -> Result<Self, Self::Error> {
        let owner_id = required(req.owner_id)?;
        let name = required(req.name)?;
        let street_address = required(req.street_address)?;
        let city = required(req.city)?;
        let state = required(req.state)?;
        let zip_code = required(req.zip_code)?;

        Ok(Self {
            owner_id,
            name: max_len("name", name, MAX_NAME_LEN)?,
            street_address: max_len("street_address", street_address, MAX_STREET_ADDRESS_LEN)?,
            city: max_len("city", city, MAX_CITY_LEN)?,
            state: max_len("state", state, MAX_STATE_LEN)?,
            zip_code,
        })
    }
}
