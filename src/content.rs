//! Static site copy. Read-only tables consumed by the page sections.

pub struct Company {
	pub name: &'static str,
	pub tagline: &'static str,
	pub pitch: &'static str,
	pub email: &'static str,
	pub phone: &'static str,
	pub address: &'static str,
}

pub struct NavLink {
	pub label: &'static str,
	pub href: &'static str,
}

pub struct Service {
	pub title: &'static str,
	pub summary: &'static str,
	pub preset: &'static str,
}

pub struct Metric {
	pub value: &'static str,
	pub label: &'static str,
}

pub const COMPANY: Company = Company {
	name: "Nexus Systems",
	tagline: "Infrastructure that thinks ahead",
	pitch: "We design, run and secure the networks, clouds and software your business depends on.",
	email: "hello@nexus-systems.example",
	phone: "+1 (555) 010-2040",
	address: "400 Harbor Street, Suite 12",
};

pub const NAV: &[NavLink] = &[
	NavLink {
		label: "Services",
		href: "#services",
	},
	NavLink {
		label: "Results",
		href: "#results",
	},
	NavLink {
		label: "Contact",
		href: "#contact",
	},
];

pub const SERVICES: &[Service] = &[
	Service {
		title: "Cloud Architecture",
		summary: "Migration plans, landing zones and cost controls for AWS, Azure and GCP.",
		preset: "orbital-rings",
	},
	Service {
		title: "Managed Networks",
		summary: "SD-WAN, campus and data-centre fabrics monitored around the clock.",
		preset: "data-cube",
	},
	Service {
		title: "Cybersecurity",
		summary: "Threat modelling, zero-trust rollouts and incident response retainers.",
		preset: "neural-cluster",
	},
	Service {
		title: "Data Platforms",
		summary: "Pipelines, warehouses and dashboards that teams actually use.",
		preset: "halo-layers",
	},
	Service {
		title: "DevOps Enablement",
		summary: "CI/CD, infrastructure as code and platform teams that ship weekly.",
		preset: "signal-ring",
	},
	Service {
		title: "IT Support",
		summary: "Help desk, device management and vendor coordination under one SLA.",
		preset: "constellation",
	},
];

pub const METRICS: &[Metric] = &[
	Metric {
		value: "99.98%",
		label: "Uptime across managed estates",
	},
	Metric {
		value: "240+",
		label: "Clients supported",
	},
	Metric {
		value: "15 min",
		label: "Median incident response",
	},
	Metric {
		value: "12 yrs",
		label: "In operation",
	},
];
