use blogdash_core::auth::Route;
use blogdash_core::Navigator;

/// Terminal stand-in for page navigation. There is no page to switch to,
/// so a redirect tells the user which command gets them there.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, route: Route) {
        match route {
            Route::Login => eprintln!("Your session has ended. Run `blogdash login` to sign in again."),
            Route::Dashboard => eprintln!("Already signed in. Run `blogdash dashboard` for an overview."),
            other => eprintln!("Continue at {}", other),
        }
    }
}
