use cnft_client::rpc::{RpcConnection, RpcError};
use solana_sdk::{
    clock::Slot,
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::Instruction,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use solana_transaction_status::TransactionStatus;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::{attempt::MintAttempt, confirmation::ConfirmationConfig, error::MintError};

/// Prepends compute budget instructions when a price or limit is set.
pub fn with_compute_budget(
    instruction: Instruction,
    compute_unit_price: Option<u64>,
    compute_unit_limit: Option<u32>,
) -> Vec<Instruction> {
    let mut instructions: Vec<Instruction> = if let Some(price) = compute_unit_price {
        vec![ComputeBudgetInstruction::set_compute_unit_price(price)]
    } else {
        vec![]
    };
    if let Some(limit) = compute_unit_limit {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(limit));
    }
    instructions.push(instruction);
    instructions
}

pub fn build_signed_transaction(
    instructions: &[Instruction],
    payer: &Keypair,
    recent_blockhash: Hash,
) -> Transaction {
    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    transaction.sign(&[payer], recent_blockhash);
    transaction
}

fn is_already_processed(error: &RpcError) -> bool {
    matches!(
        error.transaction_error(),
        Some(TransactionError::AlreadyProcessed)
    )
}

/// Submits `transaction` and polls its signature until it reaches the
/// configured commitment, fails, or the budget runs out.
///
/// `attempt` must be `Signed` and ends `Confirmed`, `Rejected` or `TimedOut`.
/// A send that fails in transit may still have reached the cluster, so the
/// signature is polled like any other and an unseen transaction ends in
/// [`MintError::SubmissionTimeout`]. `deadline` bounds the first send and
/// the polling.
pub async fn send_and_confirm<R: RpcConnection + ?Sized>(
    rpc: &R,
    transaction: &Transaction,
    attempt: &mut MintAttempt,
    config: &ConfirmationConfig,
    deadline: Option<Instant>,
) -> Result<Slot, MintError> {
    let signature = transaction.signatures[0];

    let sent = match deadline {
        Some(deadline) => timeout_at(deadline, rpc.send_transaction(transaction))
            .await
            .unwrap_or_else(|_| Err(RpcError::CustomError("send reached the deadline".into()))),
        None => rpc.send_transaction(transaction).await,
    };

    match sent {
        Ok(_) => {
            attempt.submitted()?;
            info!("Transaction sent: {}", signature);
        }
        Err(e) if is_already_processed(&e) => {
            attempt.submitted()?;
            info!("Transaction {} was already processed", signature);
        }
        Err(e) => match e.transaction_error() {
            Some(error) => {
                attempt.rejected()?;
                warn!("Transaction {} rejected at submission: {}", signature, error);
                return Err(MintError::from_transaction_error(
                    error,
                    e.logs(),
                    Some(signature),
                ));
            }
            None => {
                attempt.submitted()?;
                warn!(
                    "Error sending transaction {}, polling its status: {:?}",
                    signature, e
                );
            }
        },
    }

    for poll in 1..=config.max_attempts {
        let mut delay = config.delay_for_attempt(poll);
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            delay = delay.min(deadline - now);
        }
        sleep(delay).await;

        let status = match rpc.get_signature_statuses(&[signature]).await {
            Ok(mut statuses) => statuses.pop().flatten(),
            Err(e) => {
                debug!("Status query for {} failed: {:?}", signature, e);
                None
            }
        };

        match status {
            Some(TransactionStatus {
                err: Some(error), ..
            }) => {
                let logs = match rpc.get_transaction_meta(&signature).await {
                    Ok(meta) => meta.log_messages,
                    Err(e) => {
                        debug!("Could not fetch logs of {}: {:?}", signature, e);
                        Vec::new()
                    }
                };
                attempt.rejected()?;
                warn!("Transaction {} failed: {}", signature, error);
                return Err(MintError::from_transaction_error(
                    &error,
                    &logs,
                    Some(signature),
                ));
            }
            Some(status) if status.satisfies_commitment(config.commitment) => {
                attempt.confirmed()?;
                info!("Transaction {} confirmed in slot {}", signature, status.slot);
                return Ok(status.slot);
            }
            Some(status) => {
                debug!(
                    "Transaction {} seen in slot {}, waiting for {:?}",
                    signature, status.slot, config.commitment.commitment
                );
            }
            None if config.rebroadcast => {
                attempt.rebroadcast()?;
                if let Err(e) = rpc.send_transaction(transaction).await {
                    if !is_already_processed(&e) {
                        debug!("Rebroadcast of {} failed: {:?}", signature, e);
                    }
                }
            }
            None => {}
        }
    }

    attempt.timed_out()?;
    warn!(
        "Transaction {} not confirmed after {} broadcasts",
        signature,
        attempt.broadcasts()
    );
    Err(MintError::SubmissionTimeout { signature })
}

/// Signature of a signed transaction, recorded on `attempt`.
pub fn record_signature(
    transaction: &Transaction,
    attempt: &mut MintAttempt,
) -> Result<Signature, MintError> {
    let signature = transaction.signatures[0];
    attempt.signed(signature)?;
    Ok(signature)
}
