use aide::axum::ApiRouter;

mod ens;

pub fn handler() -> ApiRouter {
	ApiRouter::new().nest("/ens", ens::handler())
}
