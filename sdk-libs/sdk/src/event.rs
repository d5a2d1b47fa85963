use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;
use tracing::trace;

use crate::constants::PROGRAM_ID_NOOP;

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    pub node: [u8; 32],
    pub index: u32,
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEventV1 {
    /// Public key of the merkle tree.
    pub id: Pubkey,
    pub path: Vec<PathNode>,
    pub seq: u64,
    /// Index of the leaf that changed.
    pub index: u32,
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum ChangeLogEvent {
    V1(ChangeLogEventV1),
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationDataEvent {
    V1 { application_data: Vec<u8> },
}

/// Payload the account-compression program logs through the noop program.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum AccountCompressionEvent {
    ChangeLog(ChangeLogEvent),
    ApplicationData(ApplicationDataEvent),
}

/// An instruction executed inside a transaction, decoded from its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerInstruction {
    pub program_id: Pubkey,
    pub data: Vec<u8>,
}

/// Finds the change-log event emitted for `merkle_tree` among the inner
/// instructions of a mint transaction.
pub fn find_change_log_event(
    inner_instructions: &[InnerInstruction],
    merkle_tree: &Pubkey,
) -> Option<ChangeLogEventV1> {
    inner_instructions
        .iter()
        .filter(|ix| ix.program_id == PROGRAM_ID_NOOP)
        .find_map(|ix| {
            match AccountCompressionEvent::deserialize(&mut ix.data.as_slice()) {
                Ok(AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(event)))
                    if event.id == *merkle_tree =>
                {
                    Some(event)
                }
                Ok(_) => None,
                Err(e) => {
                    trace!("Skipping noop instruction that is not a change log: {:?}", e);
                    None
                }
            }
        })
}

/// Leaf index assigned by the mint, if the transaction logged it.
pub fn find_leaf_index(
    inner_instructions: &[InnerInstruction],
    merkle_tree: &Pubkey,
) -> Option<u32> {
    find_change_log_event(inner_instructions, merkle_tree).map(|event| event.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change_log(tree: Pubkey, index: u32) -> InnerInstruction {
        let event = AccountCompressionEvent::ChangeLog(ChangeLogEvent::V1(ChangeLogEventV1 {
            id: tree,
            path: vec![
                PathNode {
                    node: [1; 32],
                    index: (1 << 3) | index,
                },
                PathNode {
                    node: [2; 32],
                    index: 1,
                },
            ],
            seq: 42,
            index,
        }));
        InnerInstruction {
            program_id: PROGRAM_ID_NOOP,
            data: event.try_to_vec().unwrap(),
        }
    }

    #[test]
    fn test_find_leaf_index() {
        let tree = Pubkey::new_unique();
        let other_tree = Pubkey::new_unique();
        let application_data = InnerInstruction {
            program_id: PROGRAM_ID_NOOP,
            data: AccountCompressionEvent::ApplicationData(ApplicationDataEvent::V1 {
                application_data: vec![1, 2, 3],
            })
            .try_to_vec()
            .unwrap(),
        };
        let unrelated = InnerInstruction {
            program_id: Pubkey::new_unique(),
            data: change_log(tree, 9).data,
        };
        let garbage = InnerInstruction {
            program_id: PROGRAM_ID_NOOP,
            data: vec![7],
        };

        let inner = vec![
            garbage,
            unrelated,
            application_data,
            change_log(other_tree, 1),
            change_log(tree, 5),
        ];
        assert_eq!(find_leaf_index(&inner, &tree), Some(5));
        assert_eq!(find_leaf_index(&inner, &other_tree), Some(1));
        assert_eq!(find_leaf_index(&inner, &Pubkey::new_unique()), None);
        assert_eq!(
            find_change_log_event(&inner, &tree).map(|event| event.seq),
            Some(42)
        );
    }
}
