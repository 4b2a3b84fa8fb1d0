use rocket::Route;

mod answer;
mod auth;
mod report;
mod survey;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(survey::routes());
    routes.extend(answer::routes());
    routes.extend(report::routes());
    routes
}
