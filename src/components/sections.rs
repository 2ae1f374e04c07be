use leptos::prelude::*;

use super::backdrop::NetworkBackdrop;
use crate::content::{COMPANY, METRICS, NAV, SERVICES};

#[component]
pub fn Header() -> impl IntoView {
	view! {
		<header class="site-header">
			<a class="brand" href="/">{COMPANY.name}</a>
			<nav>
				{NAV
					.iter()
					.map(|link| view! { <a href=link.href>{link.label}</a> })
					.collect_view()}
			</nav>
		</header>
	}
}

/// Full-viewport hero over the default network backdrop.
#[component]
pub fn Hero() -> impl IntoView {
	view! {
		<section class="hero" style="position: relative; height: 100vh;">
			<NetworkBackdrop preset="plexus-sphere" fullscreen=true />
			<div class="hero__copy" style="position: absolute; inset: 0; display: grid; place-content: center;">
				<h1>{COMPANY.tagline}</h1>
				<p class="subtitle">{COMPANY.pitch}</p>
				<a class="cta" href="#contact">"Talk to an engineer"</a>
			</div>
		</section>
	}
}

#[component]
pub fn ServiceGrid() -> impl IntoView {
	view! {
		<section id="services" class="services">
			<h2>"What we do"</h2>
			<div class="services__grid">
				{SERVICES
					.iter()
					.map(|service| {
						view! {
							<article class="service-card" style="position: relative; min-height: 14rem;">
								<NetworkBackdrop preset=service.preset seed=7 />
								<div class="service-card__body" style="position: relative;">
									<h3>{service.title}</h3>
									<p>{service.summary}</p>
								</div>
							</article>
						}
					})
					.collect_view()}
			</div>
		</section>
	}
}

#[component]
pub fn Metrics() -> impl IntoView {
	view! {
		<section id="results" class="metrics" style="position: relative;">
			<NetworkBackdrop preset="signal-ring" height=Some(220.0) />
			{METRICS
				.iter()
				.map(|m| {
					view! {
						<div class="metric">
							<strong>{m.value}</strong>
							<span>{m.label}</span>
						</div>
					}
				})
				.collect_view()}
		</section>
	}
}

#[component]
pub fn Footer() -> impl IntoView {
	view! {
		<footer id="contact" class="site-footer" style="position: relative; min-height: 16rem;">
			<NetworkBackdrop preset="constellation" />
			<div class="site-footer__body" style="position: relative;">
				<h2>{COMPANY.name}</h2>
				<p>{COMPANY.address}</p>
				<p>
					<a href=format!("mailto:{}", COMPANY.email)>{COMPANY.email}</a>
				</p>
				<p>{COMPANY.phone}</p>
			</div>
		</footer>
	}
}
