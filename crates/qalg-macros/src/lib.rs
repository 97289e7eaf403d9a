extern crate proc_macro;
use proc_macro2::Span;
use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens, TokenStreamExt};
use syn::parse::{Parse, ParseStream, Result};
use syn::punctuated::Punctuated;
use syn::{braced, parenthesized, parse_macro_input, Generics, Ident, Token, Type, Visibility};

/// Parsed form of
///
/// ```text
/// impl<F: Bound> Name<F> {
///     pub fn product_name(c0, c1, ..., cN);
/// }
/// ```
struct Input {
    generics: Generics,
    self_ty: Type,
    vis: Visibility,
    fn_name: Ident,
    components: Vec<Ident>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> Result<Self> {
        input.parse::<Token![impl]>()?;
        let generics: Generics = input.parse()?;
        let self_ty: Type = input.parse()?;

        let body;
        braced!(body in input);
        let vis: Visibility = body.parse()?;
        body.parse::<Token![fn]>()?;
        let fn_name: Ident = body.parse()?;
        let args;
        parenthesized!(args in body);
        let components = Punctuated::<Ident, Token![,]>::parse_terminated(&args)?
            .into_iter()
            .collect::<Vec<_>>();
        body.parse::<Token![;]>()?;

        if components.is_empty() || !components.len().is_power_of_two() {
            return Err(syn::Error::new(
                fn_name.span(),
                "the number of components must be a power of two (1, 2, 4, 8, ...)",
            ));
        }

        Ok(Input {
            generics,
            self_ty,
            vis,
            fn_name,
            components,
        })
    }
}

/// Multiply two basis units of a Cayley–Dickson algebra of the given dimension.
///
/// Units are numbered so that unit 0 is the real unit
/// and the product of units `p` and `q` is always `±(p ^ q)`.
/// Returns the sign of that product.
///
/// The doubling rule used is (a, b)(c, d) = (ac − d̄b, da + bc̄),
/// which yields i·j = k, j·k = i, k·i = j for quaternions.
fn unit_product_sign(dimension: usize, p: usize, q: usize) -> isize {
    if dimension == 1 {
        return 1;
    }
    let half = dimension / 2;
    let (p0, p_hi) = (p % half, p >= half);
    let (q0, q_hi) = (q % half, q >= half);
    let conj = |u: usize| if u == 0 { 1 } else { -1 };
    match (p_hi, q_hi) {
        (false, false) => unit_product_sign(half, p0, q0),
        (false, true) => unit_product_sign(half, q0, p0),
        (true, false) => unit_product_sign(half, p0, q0) * conj(q0),
        (true, true) => -conj(q0) * unit_product_sign(half, q0, p0),
    }
}

/// Multiplication table for the basis units.
/// Each entry is a tuple of the (coefficient, unit_index)
/// e.g. (-1, 0) means the product is -1 times the real unit
fn multiplication_table(dimension: usize) -> Vec<Vec<(isize, usize)>> {
    (0..dimension)
        .map(|p| {
            (0..dimension)
                .map(|q| (unit_product_sign(dimension, p, q), p ^ q))
                .collect()
        })
        .collect()
}

#[derive(Default, Clone)]
struct SymbolicSumExpr(Vec<SymbolicProdExpr>);

#[derive(PartialEq, Eq, Clone)]
struct SymbolicProdExpr(isize, Vec<Symbol>);

#[derive(PartialEq, Eq, Clone)]
struct Symbol(Ident);

impl ToTokens for Symbol {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = &self.0;
        tokens.append_all(quote! { #ident.clone() });
    }
}

impl ToTokens for SymbolicSumExpr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        if self.0.is_empty() {
            panic!("Every component of a Cayley–Dickson product has at least one term");
        }
        for (count, prod_expr) in self.0.iter().enumerate() {
            let SymbolicProdExpr(coef, prod_terms) = prod_expr;
            let coef = *coef;

            if coef >= 0 {
                if count != 0 {
                    tokens.append_all(quote! { + });
                }
            } else {
                tokens.append_all(quote! { - });
            }

            if coef.abs() != 1 {
                panic!("Coefficient on symbols was not -1 or 1");
            }
            for (sym_count, sym) in prod_terms.iter().enumerate() {
                if sym_count > 0 {
                    tokens.append_all(quote! { * });
                }
                sym.to_tokens(tokens);
            }
        }
    }
}

impl SymbolicSumExpr {
    fn simplify(mut self) -> Self {
        // Term order is kept as generated so that floating point
        // rounding follows the textbook formula.
        self.0.retain(|prod| prod.0 != 0);
        self
    }
}

fn coefficient_symbol(var: &str, index: usize) -> Symbol {
    Symbol(Ident::new(&format!("{}{}", var, index), Span::call_site()))
}

/// One symbolic sum per output component.
/// Terms are ordered by the index of the left operand's component.
fn generate_symbolic_product(dimension: usize) -> Vec<SymbolicSumExpr> {
    let table = multiplication_table(dimension);
    let mut result: Vec<SymbolicSumExpr> = vec![Default::default(); dimension];
    for (p, row) in table.iter().enumerate() {
        for (q, &(coef, out)) in row.iter().enumerate() {
            result[out].0.push(SymbolicProdExpr(
                coef,
                vec![coefficient_symbol("a", p), coefficient_symbol("b", q)],
            ));
        }
    }
    result.into_iter().map(|expr| expr.simplify()).collect()
}

fn gen_product(input: Input) -> TokenStream {
    let Input {
        generics,
        self_ty,
        vis,
        fn_name,
        components,
    } = input;

    let dimension = components.len();
    let expressions = generate_symbolic_product(dimension);

    let destructure = |var: &str| {
        let fields: TokenStream = components
            .iter()
            .enumerate()
            .map(|(ix, field)| {
                let binding = format_ident!("{}{}", var, ix);
                quote! { #field: #binding, }
            })
            .collect();
        quote! { Self { #fields } }
    };
    let destructure_a = destructure("a");
    let destructure_b = destructure("b");

    let output_fields: TokenStream = components
        .iter()
        .zip(expressions.iter())
        .map(|(field, expr)| quote! { #field: #expr, })
        .collect();

    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let doc = format!(
        "Cayley–Dickson product of two {}-component values, `a · b`",
        dimension
    );

    quote! {
        impl #impl_generics #self_ty #where_clause {
            #[doc = #doc]
            #[inline]
            #vis fn #fn_name(a: &Self, b: &Self) -> Self {
                let #destructure_a = a;
                let #destructure_b = b;
                Self {
                    #output_fields
                }
            }
        }
    }
}

/// Generate the multiplication of a hypercomplex struct from its component list
///
/// ```ignore
/// cayley_dickson! {
///     impl<F: RealField> Quaternion<F> {
///         pub(crate) fn hamilton_product(r, i, j, k);
///     }
/// }
/// ```
///
/// The components are listed real part first.
/// Every field must have the same type, which must be `Clone`
/// and closed under `+`, `-`, `*`.
#[proc_macro]
pub fn cayley_dickson(input_tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse input
    let input = parse_macro_input!(input_tokens as Input);

    gen_product(input).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Units: 0 = 1, 1 = i, 2 = j, 3 = k
    #[test]
    fn quaternion_units() {
        let t = multiplication_table(4);
        assert_eq!(t[1][1], (-1, 0));
        assert_eq!(t[2][2], (-1, 0));
        assert_eq!(t[3][3], (-1, 0));
        assert_eq!(t[1][2], (1, 3));
        assert_eq!(t[2][3], (1, 1));
        assert_eq!(t[3][1], (1, 2));
        assert_eq!(t[2][1], (-1, 3));
        assert_eq!(t[1][3], (-1, 2));
    }

    #[test]
    fn complex_units() {
        let t = multiplication_table(2);
        assert_eq!(t[0][1], (1, 1));
        assert_eq!(t[1][1], (-1, 0));
    }

    #[test]
    fn octonion_units_square_to_minus_one() {
        let t = multiplication_table(8);
        for u in 1..8 {
            assert_eq!(t[u][u], (-1, 0));
            assert_eq!(t[0][u], (1, u));
            assert_eq!(t[u][0], (1, u));
            for v in 1..8 {
                if u != v {
                    // Distinct imaginary units anticommute
                    assert_eq!(t[u][v].0, -t[v][u].0);
                }
            }
        }
    }

    #[test]
    fn hamilton_term_order() {
        let exprs = generate_symbolic_product(4);
        let i_terms: Vec<(isize, String)> = exprs[1]
            .0
            .iter()
            .map(|SymbolicProdExpr(c, s)| (*c, format!("{}{}", s[0].0, s[1].0)))
            .collect();
        assert_eq!(
            i_terms,
            vec![
                (1, "a0b1".to_owned()),
                (1, "a1b0".to_owned()),
                (1, "a2b3".to_owned()),
                (-1, "a3b2".to_owned()),
            ]
        );
    }

    #[test]
    fn rejects_non_power_of_two() {
        let parsed = syn::parse_str::<Input>("impl<F> Foo<F> { fn product(a, b, c); }");
        assert!(parsed.is_err());
    }

    #[test]
    fn generates_code() {
        let input = syn::parse_str::<Input>(
            "impl<F: Clone> Quaternion<F> { pub(crate) fn product(r, i, j, k); }",
        )
        .unwrap();
        let code = gen_product(input).to_string();
        assert!(code.contains("fn product"));
    }
}
