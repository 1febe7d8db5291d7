//! Events emitted while processing results, for downstream collaborators
//! (reporting, notifications).

use vscout_core::{Opportunity, Venue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    VenueUpserted {
        venue: Venue,
        created: bool,
    },
    OpportunityDetected(Opportunity),
    /// One results file finished.
    QueryBatchProcessed {
        accepted: usize,
        rejected: usize,
        duplicates: usize,
    },
}

/// Receives pipeline events in emission order.
pub trait EventSink {
    fn emit(&mut self, event: PipelineEvent);
}

/// Collects events in memory.
impl EventSink for Vec<PipelineEvent> {
    fn emit(&mut self, event: PipelineEvent) {
        self.push(event);
    }
}

/// Writes every event to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::VenueUpserted { venue, created } => tracing::info!(
                venue_id = %venue.id,
                name = %venue.name,
                city = %venue.city,
                status = %venue.status,
                created,
                "venue upserted"
            ),
            PipelineEvent::OpportunityDetected(opportunity) => tracing::info!(
                venue_id = %opportunity.venue_id,
                opportunity_type = %opportunity.opportunity_type,
                suitable_acts = ?opportunity.suitable_acts,
                "opportunity detected"
            ),
            PipelineEvent::QueryBatchProcessed {
                accepted,
                rejected,
                duplicates,
            } => tracing::info!(accepted, rejected, duplicates, "query batch processed"),
        }
    }
}
