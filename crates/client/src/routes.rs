//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{
    AdminCreateTrip, AdminDashboard, AdminEditTrip, AdminLayout, AdminReservations, AdminTripSpaces, AdminTrips,
    AdminVerifications, AppLayout, AuthLayout, CreateReservation, ForgotPassword, Home, Login,
    MyReservations, NotFound, Register, TripDetail, Trips, Verification,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    // Signed-out pages
    #[layout(AuthLayout)]
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/forgot-password")]
        ForgotPassword {},
    #[end_layout]

    // Everything else needs a session
    #[layout(AppLayout)]
        #[route("/")]
        Home {},
        #[route("/trips")]
        Trips {},
        #[route("/trips/:trip_id")]
        TripDetail { trip_id: String },
        #[route("/reservations/new/:trip_id")]
        CreateReservation { trip_id: String },
        #[route("/reservations")]
        MyReservations {},
        #[route("/verification")]
        Verification {},

        #[nest("/admin")]
            #[layout(AdminLayout)]
                #[route("/")]
                AdminDashboard {},
                #[route("/reservations")]
                AdminReservations {},
                #[route("/verifications")]
                AdminVerifications {},
                #[route("/trips")]
                AdminTrips {},
                #[route("/trips/new")]
                AdminCreateTrip {},
                #[route("/trips/:trip_id/spaces")]
                AdminTripSpaces { trip_id: String },
                #[route("/trips/:trip_id/edit")]
                AdminEditTrip { trip_id: String },
            #[end_layout]
        #[end_nest]
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_links_resolve_to_routes() {
        assert_eq!("/reservations".parse::<Route>().ok(), Some(Route::MyReservations {}));
        assert_eq!(
            "/trips/t1".parse::<Route>().ok(),
            Some(Route::TripDetail { trip_id: "t1".into() })
        );
        assert_eq!(
            "/admin/trips/t1/spaces".parse::<Route>().ok(),
            Some(Route::AdminTripSpaces { trip_id: "t1".into() })
        );
    }

    #[test]
    fn verification_page_is_routed() {
        assert_eq!("/verification".parse::<Route>().ok(), Some(Route::Verification {}));
    }

    #[test]
    fn admin_trip_creation_is_not_a_trip_id() {
        assert_eq!("/admin/trips/new".parse::<Route>().ok(), Some(Route::AdminCreateTrip {}));
        assert_eq!(
            "/admin/trips/t1/edit".parse::<Route>().ok(),
            Some(Route::AdminEditTrip { trip_id: "t1".into() })
        );
    }
}
