use super::client_context::LoggingClientContext;
use log::{info, warn};
use rdkafka::ClientContext;
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::consumer::{BaseConsumer, Consumer, ConsumerContext};
use rdkafka::error::{KafkaError, KafkaResult};
use rdkafka::topic_partition_list::{Offset, TopicPartitionList};
use rdkafka::types::RDKafkaRespErr;

/// Rewrite a freshly assigned partition list before it is applied.
///
/// With `offset_earliest` every partition starts from the beginning of the
/// log, whatever the group has committed. Otherwise the list is untouched.
pub fn prepare_assignment(tpl: &mut TopicPartitionList, offset_earliest: bool) -> KafkaResult<()> {
    if offset_earliest {
        tpl.set_all_offsets(Offset::Beginning)?;
    }
    Ok(())
}

/// Consumer context applying [`prepare_assignment`] on every rebalance
#[derive(Debug, Clone)]
pub struct AssignmentContext {
    offset_earliest: bool,
    logging: LoggingClientContext,
}

impl AssignmentContext {
    pub fn new(label: impl Into<String>, offset_earliest: bool) -> Self {
        Self {
            offset_earliest,
            logging: LoggingClientContext::new(label),
        }
    }

    pub fn offset_earliest(&self) -> bool {
        self.offset_earliest
    }
}

impl ClientContext for AssignmentContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, message: &str) {
        self.logging.log(level, fac, message);
    }

    fn error(&self, error: KafkaError, reason: &str) {
        self.logging.error(error, reason);
    }
}

impl ConsumerContext for AssignmentContext {
    fn rebalance(
        &self,
        base_consumer: &BaseConsumer<Self>,
        err: RDKafkaRespErr,
        tpl: &mut TopicPartitionList,
    ) {
        match err {
            RDKafkaRespErr::RD_KAFKA_RESP_ERR__ASSIGN_PARTITIONS => {
                if let Err(e) = prepare_assignment(tpl, self.offset_earliest) {
                    warn!(
                        "[{}] Could not rewind assignment to beginning: {}",
                        self.logging.label(),
                        e
                    );
                }
                info!(
                    "[{}] Assigned {} partitions (earliest: {})",
                    self.logging.label(),
                    tpl.count(),
                    self.offset_earliest
                );
                if let Err(e) = base_consumer.assign(tpl) {
                    warn!("[{}] Assignment failed: {}", self.logging.label(), e);
                }
            }
            RDKafkaRespErr::RD_KAFKA_RESP_ERR__REVOKE_PARTITIONS => {
                info!(
                    "[{}] Revoked {} partitions",
                    self.logging.label(),
                    tpl.count()
                );
                if let Err(e) = base_consumer.unassign() {
                    warn!("[{}] Unassign failed: {}", self.logging.label(), e);
                }
            }
            other => {
                warn!("[{}] Rebalance error: {:?}", self.logging.label(), other);
                if let Err(e) = base_consumer.unassign() {
                    warn!("[{}] Unassign failed: {}", self.logging.label(), e);
                }
            }
        }
    }
}
