// certificate-generation-service/src/config.rs

use std::collections::BTreeMap;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::CertificateKind;
use crate::remote::{
    FN_DEFECTS, FN_TECH_RECORDS, FN_TEST_RESULTS, FN_TEST_STATIONS, FN_TRAILER_REGISTRATION,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub pubsub: PubSubConfig,
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    pub documents: DocumentNames,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
    /// Deployment branch; `prod` is the only one issuing valid certificates.
    pub branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PubSubConfig {
    pub project_id: String,
    pub request_subscription: String,
    pub response_topic: String,
    pub max_concurrent_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub retry_attempts: u32,
    pub defects_endpoint: String,
    pub test_stations_endpoint: String,
    pub trailer_registration_endpoint: String,
    pub test_results_endpoint: String,
    pub tech_records_endpoint: String,
}

impl RemoteConfig {
    pub fn endpoints(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (FN_DEFECTS.to_string(), self.defects_endpoint.clone()),
            (FN_TEST_STATIONS.to_string(), self.test_stations_endpoint.clone()),
            (
                FN_TRAILER_REGISTRATION.to_string(),
                self.trailer_registration_endpoint.clone(),
            ),
            (FN_TEST_RESULTS.to_string(), self.test_results_endpoint.clone()),
            (FN_TECH_RECORDS.to_string(), self.tech_records_endpoint.clone()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub signature_bucket: String,
}

/// Renderer document names per certificate kind; the bilingual variant of a
/// pass/fail/PRS certificate appends a `W`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentNames {
    pub pass: String,
    pub fail: String,
    pub prs: String,
    pub roadworthiness: String,
    pub adr: String,
    pub iva: String,
    pub msva: String,
}

impl DocumentNames {
    pub fn document_name(&self, kind: CertificateKind, bilingual: bool) -> String {
        let base = match kind {
            CertificateKind::Pass => &self.pass,
            CertificateKind::Fail => &self.fail,
            CertificateKind::Prs => &self.prs,
            CertificateKind::Roadworthiness => &self.roadworthiness,
            CertificateKind::Adr => &self.adr,
            CertificateKind::Iva => &self.iva,
            CertificateKind::Msva => &self.msva,
        };
        let has_welsh_variant = matches!(
            kind,
            CertificateKind::Pass | CertificateKind::Fail | CertificateKind::Prs
        );
        if bilingual && has_welsh_variant {
            format!("{base}W")
        } else {
            base.clone()
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "certificate-generation-service")?
            .set_default("service.log_level", "info")?
            .set_default("service.branch", "local")?
            .set_default("pubsub.project_id", "cvs-services")?
            .set_default("pubsub.request_subscription", "certificate-generation-requests-sub")?
            .set_default("pubsub.response_topic", "certificate-generation-results")?
            .set_default("pubsub.max_concurrent_messages", "10")?
            .set_default("remote.retry_attempts", "3")?
            .set_default("remote.defects_endpoint", "http://localhost:3001/defects")?
            .set_default("remote.test_stations_endpoint", "http://localhost:3002/test-stations")?
            .set_default(
                "remote.trailer_registration_endpoint",
                "http://localhost:3003/trailers",
            )?
            .set_default("remote.test_results_endpoint", "http://localhost:3004/test-results")?
            .set_default("remote.tech_records_endpoint", "http://localhost:3005/tech-records")?
            .set_default("storage.signature_bucket", "cvs-signature-local")?
            .set_default("documents.pass", "VTP20")?
            .set_default("documents.fail", "VTP30")?
            .set_default("documents.prs", "PSV_PRS")?
            .set_default("documents.roadworthiness", "RWT")?
            .set_default("documents.adr", "ADR_PASS")?
            .set_default("documents.iva", "IVA30")?
            .set_default("documents.msva", "MSV30")?
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., SERVICE__BRANCH)
            .add_source(Environment::with_prefix("SERVICE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> DocumentNames {
        DocumentNames {
            pass: "VTP20".to_string(),
            fail: "VTP30".to_string(),
            prs: "PSV_PRS".to_string(),
            roadworthiness: "RWT".to_string(),
            adr: "ADR_PASS".to_string(),
            iva: "IVA30".to_string(),
            msva: "MSV30".to_string(),
        }
    }

    #[test]
    fn bilingual_pass_and_fail_documents_take_a_welsh_suffix() {
        let docs = documents();
        assert_eq!(docs.document_name(CertificateKind::Pass, true), "VTP20W");
        assert_eq!(docs.document_name(CertificateKind::Fail, true), "VTP30W");
        assert_eq!(docs.document_name(CertificateKind::Prs, true), "PSV_PRSW");
    }

    #[test]
    fn non_bilingual_and_non_welsh_kinds_keep_the_base_name() {
        let docs = documents();
        assert_eq!(docs.document_name(CertificateKind::Pass, false), "VTP20");
        assert_eq!(docs.document_name(CertificateKind::Adr, true), "ADR_PASS");
        assert_eq!(docs.document_name(CertificateKind::Msva, false), "MSV30");
    }
}
