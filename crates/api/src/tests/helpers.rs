// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request_response::{CreateBookingRequest, QuotePricingInput};
use rutero::{BlockRuleSource, SourceUnavailable, StaticDurationTable, StaticFleetCatalog};
use rutero_audit::Actor;
use rutero_domain::{BlockRule, Place, VehicleClass};
use time::macros::{date, time};

pub struct NoRules;

impl BlockRuleSource for NoRules {
    fn active_rules(&self) -> Result<Vec<BlockRule>, SourceUnavailable> {
        Ok(Vec::new())
    }
}

pub fn operator() -> Actor {
    Actor::new(String::from("op-1"), String::from("operator"))
}

pub fn fleet() -> StaticFleetCatalog {
    StaticFleetCatalog::new(vec![
        VehicleClass::new(String::from("Sedan"), 3, 1),
        VehicleClass::new(String::from("Van"), 10, 2),
    ])
}

pub fn durations() -> StaticDurationTable {
    StaticDurationTable::new(vec![
        (Place::new("Downtown"), 60),
        (Place::new("Airport"), 60),
    ])
}

pub fn create_request(client_email: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        client_name: String::from("Ada Lovelace"),
        client_email: String::from(client_email),
        client_phone: String::from("+56 9 1234 5678"),
        origin: String::from("Airport"),
        destination: String::from("Downtown"),
        date: date!(2026 - 09 - 01),
        time: time!(10:00),
        passengers: 2,
        return_date: None,
        return_time: None,
        base_fare: 30000,
        extras: Vec::new(),
        pricing: QuotePricingInput::plain(),
    }
}
