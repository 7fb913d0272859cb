//! LMDB implementation of ProposalStore.
//!
//! Proposals are keyed by their big-endian id so iteration follows
//! creation order. The next id lives in the meta database and is bumped in
//! the same write transaction as the insert.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use agora_governance::{PersistedStatus, Proposal};
use agora_store::{ListQuery, Page, ProposalStore, StoreError};
use agora_types::{ProposalId, Timestamp};

use crate::LmdbError;

const NEXT_PROPOSAL_ID_KEY: &[u8] = b"next_proposal_id";

pub struct LmdbProposalStore {
    pub(crate) env: Arc<Env>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbProposalStore {
    fn read(&self, rtxn: &RoTxn, id: ProposalId) -> Result<Proposal, LmdbError> {
        let bytes = self
            .proposals_db
            .get(rtxn, &id.to_be_bytes())?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {id}")))?;
        Ok(bincode::deserialize(bytes)?)
    }

    fn next_id(&self, rtxn: &RoTxn) -> Result<u64, LmdbError> {
        match self.meta_db.get(rtxn, NEXT_PROPOSAL_ID_KEY)? {
            Some(bytes) if bytes.len() == 8 => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(bytes);
                Ok(u64::from_be_bytes(arr))
            }
            Some(_) => Err(LmdbError::Serialization(
                "next_proposal_id has unexpected byte length".to_string(),
            )),
            None => Ok(1),
        }
    }
}

impl ProposalStore for LmdbProposalStore {
    fn create_proposal(&self, proposal: &Proposal) -> Result<(ProposalId, Timestamp), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = ProposalId::new(self.next_id(&wtxn)?);

        let mut record = proposal.clone();
        record.id = id;
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;

        self.proposals_db
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, NEXT_PROPOSAL_ID_KEY, &(id.get() + 1).to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(%id, community = %record.community_id, "stored proposal");
        Ok((id, record.created_at))
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read(&rtxn, id)?)
    }

    fn transition_status(
        &self,
        id: ProposalId,
        expected: PersistedStatus,
        next: PersistedStatus,
    ) -> Result<(), StoreError> {
        // LMDB allows one write transaction at a time, so the check and the
        // write below see no interleaved status change.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut record = self.read(&wtxn, id)?;
        if record.status != expected {
            return Err(LmdbError::Conflict(format!(
                "proposal {id} is {}, expected {expected}",
                record.status
            ))
            .into());
        }
        record.status = next;
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn list_by_community(
        &self,
        query: &ListQuery,
        now: Timestamp,
    ) -> Result<Page<Proposal>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut scanned = Vec::new();
        for item in self.proposals_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, val) = item.map_err(LmdbError::from)?;
            let proposal: Proposal = bincode::deserialize(val).map_err(LmdbError::from)?;
            if query.matches(&proposal, now) {
                scanned.push(proposal);
            }
        }
        Ok(query.select(scanned, now))
    }
}
