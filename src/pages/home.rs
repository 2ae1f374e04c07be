use leptos::prelude::*;

use crate::components::sections::{Footer, Header, Hero, Metrics, ServiceGrid};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<Header />
		<main>
			<Hero />
			<ServiceGrid />
			<Metrics />
		</main>
		<Footer />
	}
}
