//! Cloud provider types

use serde::{Deserialize, Serialize};

/// Cloud provider a policy box targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    Amazon,
    Azure,
    OpenStack,
    SoftLayer,
    Byoi,
    CloudStack,
    DimensionData,
    Gce,
    VCloud,
    VSphere,
    Test,
    Unknown,
}

impl ProviderType {
    /// Parses the platform's provider type label
    ///
    /// Matching ignores case, spaces, dashes and underscores. Labels that do
    /// not name a known provider map to `Unknown`.
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "amazon" | "amazonwebservices" | "aws" => ProviderType::Amazon,
            "azure" | "microsoftazure" => ProviderType::Azure,
            "openstack" => ProviderType::OpenStack,
            "softlayer" => ProviderType::SoftLayer,
            "byoi" => ProviderType::Byoi,
            "cloudstack" => ProviderType::CloudStack,
            "dimensiondata" => ProviderType::DimensionData,
            "gce" | "googlecomputeengine" => ProviderType::Gce,
            "vcloud" | "vmwarevcloudair" => ProviderType::VCloud,
            "vsphere" | "vmwarevsphere" => ProviderType::VSphere,
            "test" => ProviderType::Test,
            _ => ProviderType::Unknown,
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProviderType::Amazon => "Amazon Web Services",
            ProviderType::Azure => "Microsoft Azure",
            ProviderType::OpenStack => "OpenStack",
            ProviderType::SoftLayer => "SoftLayer",
            ProviderType::Byoi => "BYOI",
            ProviderType::CloudStack => "CloudStack",
            ProviderType::DimensionData => "Dimension Data",
            ProviderType::Gce => "Google Compute Engine",
            ProviderType::VCloud => "VMware vCloud Air",
            ProviderType::VSphere => "VMware vSphere",
            ProviderType::Test => "Test",
            ProviderType::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}
