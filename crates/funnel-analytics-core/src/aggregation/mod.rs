pub mod qualification;
pub mod revenue;

pub use qualification::{
    aggregate_qualification, aggregate_qualification_for_funnel, QualificationAggregate,
};
pub use revenue::{aggregate_revenue, RevenueAggregate};
