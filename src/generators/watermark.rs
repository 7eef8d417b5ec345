//! Watermark section. Certificates generated anywhere but the production
//! deployment are stamped NOT VALID.

use async_trait::async_trait;

use crate::error::Result;
use crate::generators::FragmentGenerator;
use crate::models::{PayloadFragment, TestRecord};

const PRODUCTION_BRANCH: &str = "prod";
const NOT_VALID_WATERMARK: &str = "NOT VALID";

pub struct WatermarkGenerator {
    branch: String,
}

impl WatermarkGenerator {
    pub fn new(branch: String) -> Self {
        Self { branch }
    }
}

#[async_trait]
impl FragmentGenerator for WatermarkGenerator {
    async fn generate(&self, _record: &TestRecord) -> Result<Vec<PayloadFragment>> {
        let watermark = if self.branch == PRODUCTION_BRANCH {
            String::new()
        } else {
            NOT_VALID_WATERMARK.to_string()
        };
        Ok(vec![PayloadFragment::Watermark(watermark)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_fixtures::record;
    use crate::models::{TestOutcome, VehicleCategory};

    #[tokio::test]
    async fn production_certificates_are_unmarked() {
        let generator = WatermarkGenerator::new("prod".to_string());
        let fragments = generator
            .generate(&record(VehicleCategory::Psv, TestOutcome::Pass))
            .await
            .unwrap();
        assert_eq!(fragments, vec![PayloadFragment::Watermark(String::new())]);
    }

    #[tokio::test]
    async fn every_other_branch_is_stamped_not_valid() {
        let generator = WatermarkGenerator::new("develop".to_string());
        let fragments = generator
            .generate(&record(VehicleCategory::Psv, TestOutcome::Pass))
            .await
            .unwrap();
        assert_eq!(
            fragments,
            vec![PayloadFragment::Watermark("NOT VALID".to_string())]
        );
    }
}
