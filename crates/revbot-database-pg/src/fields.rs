use std::ops::Deref;

use revbot_models::{PlanTier, ReviewStatus, ReviewType};
use sqlx::{
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

pub struct PlanTierDecode(PlanTier);
impl<'r> Decode<'r, Postgres> for PlanTierDecode {
    fn decode(value: PgValueRef) -> core::result::Result<Self, sqlx::error::BoxDynError> {
        let str_value = <&str as Decode<Postgres>>::decode(value)?;
        PlanTier::try_from(str_value).map(Self).map_err(Into::into)
    }
}

impl Type<Postgres> for PlanTierDecode {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("varchar")
    }
}

impl Deref for PlanTierDecode {
    type Target = PlanTier;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct ReviewStatusDecode(ReviewStatus);
impl<'r> Decode<'r, Postgres> for ReviewStatusDecode {
    fn decode(value: PgValueRef) -> core::result::Result<Self, sqlx::error::BoxDynError> {
        let str_value = <&str as Decode<Postgres>>::decode(value)?;
        ReviewStatus::try_from(str_value)
            .map(Self)
            .map_err(Into::into)
    }
}

impl Type<Postgres> for ReviewStatusDecode {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("varchar")
    }
}

impl Deref for ReviewStatusDecode {
    type Target = ReviewStatus;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct ReviewTypeDecode(ReviewType);
impl<'r> Decode<'r, Postgres> for ReviewTypeDecode {
    fn decode(value: PgValueRef) -> core::result::Result<Self, sqlx::error::BoxDynError> {
        let str_value = <&str as Decode<Postgres>>::decode(value)?;
        ReviewType::try_from(str_value)
            .map(Self)
            .map_err(Into::into)
    }
}

impl Type<Postgres> for ReviewTypeDecode {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("varchar")
    }
}

impl Deref for ReviewTypeDecode {
    type Target = ReviewType;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
