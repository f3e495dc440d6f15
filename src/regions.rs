// Static AWS region catalog for the create-profile picker

pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
}

pub const REGIONS: &[Region] = &[
    Region { name: "US East (Ohio)", code: "us-east-2" },
    Region { name: "US East (N. Virginia)", code: "us-east-1" },
    Region { name: "US West (N. California)", code: "us-west-1" },
    Region { name: "US West (Oregon)", code: "us-west-2" },
    Region { name: "Africa (Cape Town)", code: "af-south-1" },
    Region { name: "Asia Pacific (Hong Kong)", code: "ap-east-1" },
    Region { name: "Asia Pacific (Mumbai)", code: "ap-south-1" },
    Region { name: "Asia Pacific (Osaka-Local)", code: "ap-northeast-3" },
    Region { name: "Asia Pacific (Seoul)", code: "ap-northeast-2" },
    Region { name: "Asia Pacific (Singapore)", code: "ap-southeast-1" },
    Region { name: "Asia Pacific (Sydney)", code: "ap-southeast-2" },
    Region { name: "Asia Pacific (Tokyo)", code: "ap-northeast-1" },
    Region { name: "Canada (Central)", code: "ca-central-1" },
    Region { name: "China (Beijing)", code: "cn-north-1" },
    Region { name: "China (Ningxia)", code: "cn-northwest-1" },
    Region { name: "EU (Frankfurt)", code: "eu-central-1" },
    Region { name: "EU (Ireland)", code: "eu-west-1" },
    Region { name: "EU (London)", code: "eu-west-2" },
    Region { name: "EU (Milan)", code: "eu-south-1" },
    Region { name: "EU (Paris)", code: "eu-west-3" },
    Region { name: "EU (Stockholm)", code: "eu-north-1" },
    Region { name: "Middle East (Bahrain)", code: "me-south-1" },
    Region { name: "South America (Sao Paulo)", code: "sa-east-1" },
    Region { name: "AWS GovCloud (US-East)", code: "us-gov-east-1" },
    Region { name: "AWS GovCloud (US-West)", code: "us-gov-west-1" },
];

pub fn display_label(region: &Region) -> String {
    format!("{} - {}", region.code, region.name)
}
