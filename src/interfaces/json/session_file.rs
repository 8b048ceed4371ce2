use crate::application::session::Session;
use crate::domain::bill::{Charges, Dish, SplitMode, TipBasis};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct EvenBill {
    pub total_bill: Decimal,
    pub charges: Charges,
}

/// On-disk description of a session.
///
/// Every field is optional. Loading replays the contents through the
/// session's own operations, so names are trimmed and de-duplicated, dishes
/// may only be shared by listed people, and amounts must fit the money
/// limits.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct SessionFile {
    pub people: Vec<String>,
    pub split_mode: SplitMode,
    pub tip_basis: TipBasis,
    pub dishes: Vec<Dish>,
    pub charges: Charges,
    pub even: EvenBill,
}

impl SessionFile {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn write_pretty<W: Write>(&self, sink: W) -> Result<()> {
        serde_json::to_writer_pretty(sink, self)?;
        Ok(())
    }

    pub fn into_session(self) -> Result<Session> {
        let mut session = Session::new();
        for person in &self.people {
            session.add_participant(person);
        }
        session.set_split_mode(self.split_mode);
        session.set_tip_basis(self.tip_basis);
        session.set_dish_charges(self.charges)?;
        session.set_even_charges(self.even.charges)?;
        session.set_total_bill(self.even.total_bill)?;

        for dish in self.dishes {
            session.add_shared_dish(dish)?;
        }
        Ok(session)
    }
}

impl From<&Session> for SessionFile {
    fn from(session: &Session) -> Self {
        Self {
            people: session.people().to_vec(),
            split_mode: session.split_mode(),
            tip_basis: session.tip_basis(),
            dishes: session.dishes().to_vec(),
            charges: *session.dish_charges(),
            even: EvenBill {
                total_bill: session.total_bill(),
                charges: *session.even_charges(),
            },
        }
    }
}
