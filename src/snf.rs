//! Smith Normal Form with tracked unimodular basis changes (C5).
//!
//! Implements the Kannan-style reduction described in the module design:
//! repeatedly clear a pivot row and column with gcd-based column/row
//! operations, repair divisibility before advancing, and normalize the
//! pivot's sign. `R`/`Ri`/`C`/`Ci` accumulate the basis changes so that,
//! on return, `C * X_original * R == X_reduced` and `R*Ri = Ri*R = C*Ci = Ci*C = I`.

use crate::int::Int;
use crate::matrix::Matrix;
use tracing::trace;

/// Reduce `x` to Smith Normal Form in place, accumulating the basis-change
/// matrices `r`, `ri`, `c`, `ci`. All four must be passed in pre-sized to
/// identities (or a non-trivial starting coordinate change the algorithm
/// will compose into): `r`/`ri` are `cols x cols`, `c`/`ci` are `rows x rows`.
pub fn smith_normal_form<I: Int>(
    x: &mut Matrix<I>,
    r: &mut Matrix<I>,
    ri: &mut Matrix<I>,
    c: &mut Matrix<I>,
    ci: &mut Matrix<I>,
) {
    let mut non_empty_rows = x.rows();
    let mut non_empty_cols = x.cols();
    let mut stage = 0usize;

    'stage: while stage < non_empty_rows && stage < non_empty_cols {
        loop {
            // Step 1: empty row in the active window?
            if x.row_is_zero_from(stage, stage) {
                if stage == non_empty_rows - 1 {
                    non_empty_rows -= 1;
                    continue 'stage;
                }
                swap_rows_tracked(x, c, ci, stage, non_empty_rows - 1);
                non_empty_rows -= 1;
                continue;
            }

            // Step 2: empty column in the active window?
            if x.col_is_zero_from(stage, stage) {
                if stage == non_empty_cols - 1 {
                    non_empty_cols -= 1;
                    continue 'stage;
                }
                swap_cols_tracked(x, r, ri, stage, non_empty_cols - 1);
                non_empty_cols -= 1;
                continue;
            }

            // Step 3: clear row `stage` to the right of (stage, stage).
            for i in (stage + 1)..non_empty_cols {
                if x.entry(stage, i).is_zero() {
                    continue;
                }
                let (d, u, v) = x.entry(stage, stage).gcd_with_coeffs(x.entry(stage, i));
                let a = x.entry(stage, stage).div_exact(&d);
                let b = x.entry(stage, i).div_exact(&d);
                x.apply_col_op(stage, i, &u, &v, &a, &b);
                r.apply_col_op(stage, i, &u, &v, &a, &b);
                // Ri tracks the same pivot pair but as a row operation with
                // (u,v) and (a,b) swapped between the two output rows.
                ri.apply_row_op(stage, i, &a, &b, &u, &v);
            }

            // Step 4: clear column `stage` below (stage, stage); `flag`
            // records whether row `stage` itself got perturbed.
            let mut flag = false;
            for i in (stage + 1)..non_empty_rows {
                if x.entry(i, stage).is_zero() {
                    continue;
                }
                flag = true;
                let (d, u, v) = x.entry(stage, stage).gcd_with_coeffs(x.entry(i, stage));
                let a = x.entry(stage, stage).div_exact(&d);
                let b = x.entry(i, stage).div_exact(&d);
                x.apply_row_op(stage, i, &u, &v, &a, &b);
                c.apply_row_op(stage, i, &u, &v, &a, &b);
                // Ci tracks the same pivot pair but as a column operation with
                // (u,v) and (a,b) swapped between the two output columns.
                ci.apply_col_op(stage, i, &a, &b, &u, &v);
            }

            // Step 5: a column op in step 4 re-dirtied row `stage`; restart the stage.
            if flag {
                trace!(stage, "snf: column clear perturbed pivot row, restarting stage");
                continue;
            }

            // Step 6: divisibility repair.
            let pivot = x.entry(stage, stage).clone();
            let mut offending = None;
            'search: for i in (stage + 1)..non_empty_rows {
                for j in (stage + 1)..non_empty_cols {
                    let (_, rem) = x.entry(i, j).division_alg(&pivot);
                    if !rem.is_zero() {
                        offending = Some(i);
                        break 'search;
                    }
                }
            }
            if let Some(i) = offending {
                trace!(stage, row = i, "snf: divisibility repair, restarting stage");
                x.add_row_multiple(stage, i, &I::one());
                c.add_row_multiple(stage, i, &I::one());
                ci.add_col_multiple(i, stage, &I::from_int(-1));
                continue;
            }

            // Step 7: normalize sign.
            if x.entry(stage, stage).clone().is_negative_sign() {
                x.negate_row(stage);
                c.negate_row(stage);
                ci.negate_col(stage);
            }

            trace!(stage, pivot = %x.entry(stage, stage), "snf: stage complete");
            break;
        }

        // Step 8: advance.
        stage += 1;
    }
}

/// Helper: swap rows `i`/`j` of `x`, with corresponding row/col swaps on `c`/`ci`.
fn swap_rows_tracked<I: Int>(x: &mut Matrix<I>, c: &mut Matrix<I>, ci: &mut Matrix<I>, i: usize, j: usize) {
    x.swap_rows(i, j);
    c.swap_rows(i, j);
    ci.swap_cols(i, j);
}

/// Helper: swap columns `i`/`j` of `x`, with corresponding col/row swaps on `r`/`ri`.
fn swap_cols_tracked<I: Int>(x: &mut Matrix<I>, r: &mut Matrix<I>, ri: &mut Matrix<I>, i: usize, j: usize) {
    x.swap_cols(i, j);
    r.swap_cols(i, j);
    ri.swap_rows(i, j);
}

/// Small extension trait for the sign check used by the pivot-normalization
/// step, since `Int` exposes `Ord` but not a named `is_negative`.
trait NegClone: Sized {
    fn is_negative_sign(self) -> bool;
}

impl<I: Int> NegClone for I {
    fn is_negative_sign(self) -> bool {
        self < I::zero()
    }
}
