// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

pub trait EntityId:
    Copy + Eq + fmt::Debug + fmt::Display + From<i64> + Send + Sync + 'static
{
    fn get(self) -> i64;

    /// Server-assigned ids are positive; anything else is an unset reference.
    fn is_assigned(self) -> bool {
        self.get() > 0
    }
}

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl EntityId for $name {
            fn get(self) -> i64 {
                self.0
            }
        }
    };
}

entity_id!(ClientId);
entity_id!(LawyerId);
entity_id!(CaseId);
entity_id!(AppointmentId);
entity_id!(ScheduleId);
entity_id!(AdminId);
