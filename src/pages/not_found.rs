use leptos::prelude::*;

use crate::components::backdrop::NetworkBackdrop;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="not-found" style="position: relative; height: 100vh;">
			<NetworkBackdrop preset="constellation" fullscreen=true />
			<div style="position: absolute; inset: 0; display: grid; place-content: center; text-align: center;">
				<h1>"Uh oh!"</h1>
				<p>"We couldn't find that page."</p>
				<a href="/">"Back home"</a>
			</div>
		</section>
	}
}
